//! Integration tests exercising the full proposal lifecycle:
//! config → proposal → commit → reveal → resolution → settlement,
//! driven end-to-end through the engine with a manual clock.

use std::sync::Arc;
use verdict_crypto::{commit, random_salt};
use verdict_oracle::{
    ConfigPatch, ManualClock, MemoryVault, OracleEngine, OracleError, Outcome, Phase,
    StaticPowerOracle, Vault,
};
use verdict_store::MemoryStore;
use verdict_types::{ParticipantId, ProposalId, StakeAmount, Timestamp, TokenMint, VoteWeight};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const VOTING_SECS: u64 = 3_600;
const REVEAL_SECS: u64 = 1_800;
const QUORUM: u128 = 30;
const MIN_STAKE: u128 = 1_000;

struct World {
    engine: OracleEngine,
    clock: Arc<ManualClock>,
    power: Arc<StaticPowerOracle>,
    vault: Arc<MemoryVault>,
    mint: TokenMint,
    authority: ParticipantId,
}

fn participant(name: &str) -> ParticipantId {
    ParticipantId::new(format!("vdt_{name}"))
}

/// An engine with one configured mint, tuned for short test windows:
/// voting 1h, reveal 30m, quorum 30 weight, minimum stake 1000, stake rate
/// 100% (locked stake equals weight), fee 2%.
fn world() -> World {
    verdict_utils::try_init_tracing();
    let clock = Arc::new(ManualClock::new(Timestamp::new(10_000)));
    let power = Arc::new(StaticPowerOracle::new());
    let vault = Arc::new(MemoryVault::new());
    let mut engine = OracleEngine::new(power.clone(), vault.clone(), clock.clone());
    let mint = TokenMint::new("mint_usdv");
    let authority = participant("authority");
    engine
        .initialize_config(mint.clone(), authority.clone())
        .expect("config");

    // Reconfigure via a bootstrap proposal (config updates are addressed
    // through a proposal on the mint).
    power.set_weight(participant("proposer"), VoteWeight::new(1));
    let bootstrap = engine
        .create_proposal(
            &mint,
            &participant("proposer"),
            "bootstrap",
            "",
            StakeAmount::new(3_000_000),
        )
        .expect("bootstrap proposal");
    engine
        .update_config(
            &bootstrap,
            &authority,
            &ConfigPatch {
                voting_period_secs: Some(VOTING_SECS),
                reveal_period_secs: Some(REVEAL_SECS),
                required_votes: Some(VoteWeight::new(QUORUM)),
                minimum_proposal_stake: Some(StakeAmount::new(MIN_STAKE)),
                vote_stake_rate_bps: Some(10_000),
                protocol_fee_rate_bps: Some(200),
            },
        )
        .expect("tighten config");

    World {
        engine,
        clock,
        power,
        vault,
        mint,
        authority,
    }
}

fn open_proposal(w: &mut World, name: &str) -> ProposalId {
    w.engine
        .create_proposal(
            &w.mint,
            &participant("proposer"),
            name,
            "a numeric question",
            StakeAmount::new(MIN_STAKE),
        )
        .expect("proposal")
}

fn commit_with_weight(w: &mut World, id: &ProposalId, name: &str, weight: u128, value: i64) -> [u8; 32] {
    let voter = participant(name);
    let salt = random_salt();
    w.power.set_weight(voter.clone(), VoteWeight::new(weight));
    w.engine
        .submit_vote(id, &voter, commit(value, &salt))
        .expect("submit");
    salt
}

// ---------------------------------------------------------------------------
// 1. Happy path: commit, reveal, resolve, settle
// ---------------------------------------------------------------------------

#[test]
fn full_lifecycle_resolves_to_weighted_mean() {
    let mut w = world();
    let id = open_proposal(&mut w, "eth price at noon");

    let salt_a = commit_with_weight(&mut w, &id, "alice", 20, 4);
    let salt_b = commit_with_weight(&mut w, &id, "bob", 15, 6);
    assert_eq!(w.engine.phase_of(&id).unwrap(), Phase::Voting);

    w.clock.advance(VOTING_SECS);
    assert_eq!(w.engine.phase_of(&id).unwrap(), Phase::Revealing);

    w.engine
        .reveal_vote(&id, &participant("alice"), 4, &salt_a)
        .unwrap();
    assert_eq!(w.engine.phase_of(&id).unwrap(), Phase::Revealing);

    // Bob's reveal crosses quorum (20 + 15 >= 30) and resolves eagerly.
    w.engine
        .reveal_vote(&id, &participant("bob"), 6, &salt_b)
        .unwrap();
    assert_eq!(w.engine.phase_of(&id).unwrap(), Phase::Resolved);

    let resolution = match w.engine.proposal(&id).unwrap().outcome.unwrap() {
        Outcome::Resolved(r) => r,
        Outcome::Expired => panic!("expected resolution"),
    };
    assert!(resolution.quorum_reached);
    assert_eq!(resolution.total_weight, VoteWeight::new(35));
    assert_eq!(resolution.weighted_sum, 20 * 4 + 15 * 6);
    assert!((resolution.mean_f64().unwrap() - 170.0 / 35.0).abs() < 1e-9);

    // Settlement: fee first, then net payouts for proposer and voters.
    let vault_total = w.vault.balance(&id);
    assert_eq!(vault_total, StakeAmount::new(MIN_STAKE + 20 + 15));
    let authority = w.authority.clone();
    let fee = w.engine.collect_fees(&authority, &id).unwrap();
    assert_eq!(fee, vault_total.apply_bps(200).unwrap());

    let proposer_net = w.engine.collect_proposer_stake(&id).unwrap();
    assert_eq!(proposer_net, StakeAmount::new(MIN_STAKE).apply_bps(9_800).unwrap());
    let alice_net = w
        .engine
        .collect_voter_stake(&id, &participant("alice"))
        .unwrap();
    assert_eq!(alice_net, StakeAmount::new(20).apply_bps(9_800).unwrap());
    let bob_net = w
        .engine
        .collect_voter_stake(&id, &participant("bob"))
        .unwrap();
    assert_eq!(bob_net, StakeAmount::new(15).apply_bps(9_800).unwrap());

    // Everyone got paid through the vault, and only rounding dust remains.
    assert_eq!(w.vault.credited(&authority), fee);
    assert_eq!(w.vault.credited(&participant("alice")), alice_net);
    let paid = fee + proposer_net + alice_net + bob_net;
    assert!(w.vault.balance(&id) == vault_total - paid);
}

// ---------------------------------------------------------------------------
// 2. Expiry: quorum never reached
// ---------------------------------------------------------------------------

#[test]
fn proposal_without_quorum_expires_and_absorbs_stakes() {
    let mut w = world();
    let id = open_proposal(&mut w, "rainfall tomorrow");

    let salt = commit_with_weight(&mut w, &id, "alice", 10, 42);
    w.clock.advance(VOTING_SECS);
    w.engine
        .reveal_vote(&id, &participant("alice"), 42, &salt)
        .unwrap();

    // 10 < 30: the reveal window ends without quorum.
    w.clock.advance(REVEAL_SECS);
    assert_eq!(w.engine.phase_of(&id).unwrap(), Phase::Expired);
    assert_eq!(w.engine.finalize(&id).unwrap(), Phase::Expired);

    // Fees still come off the vault, but the proposer's stake is absorbed
    // and even the revealed voter on an expired proposal reclaims net stake.
    let authority = w.authority.clone();
    w.engine.collect_fees(&authority, &id).unwrap();
    let err = w.engine.collect_proposer_stake(&id).unwrap_err();
    assert!(matches!(err, OracleError::StakeForfeited(_)));
    let net = w
        .engine
        .collect_voter_stake(&id, &participant("alice"))
        .unwrap();
    assert_eq!(net, StakeAmount::new(10).apply_bps(9_800).unwrap());
}

// ---------------------------------------------------------------------------
// 3. Cancellation re-opens the voter's slot
// ---------------------------------------------------------------------------

#[test]
fn cancel_then_recommit_with_fresh_weight() {
    let mut w = world();
    let id = open_proposal(&mut w, "block gas target");
    let alice = participant("alice");

    commit_with_weight(&mut w, &id, "alice", 20, 4);
    let refund = w.engine.cancel_vote(&id, &alice).unwrap();
    assert_eq!(refund, StakeAmount::new(20));
    assert!(w.engine.vote(&id, &alice).is_none());

    // Weight changed between the two commits; the new snapshot applies.
    let salt = commit_with_weight(&mut w, &id, "alice", 35, 7);
    w.clock.advance(VOTING_SECS);
    w.engine.reveal_vote(&id, &alice, 7, &salt).unwrap();
    // 35 >= 30: resolved on the single reveal.
    assert_eq!(w.engine.phase_of(&id).unwrap(), Phase::Resolved);
    let proposal = w.engine.proposal(&id).unwrap();
    assert_eq!(proposal.revealed_weight, VoteWeight::new(35));
}

// ---------------------------------------------------------------------------
// 4. Reveal integrity and forfeiture
// ---------------------------------------------------------------------------

#[test]
fn wrong_reveal_fails_and_unrevealed_commitments_forfeit() {
    let mut w = world();
    let id = open_proposal(&mut w, "validator count");
    let (alice, bob) = (participant("alice"), participant("bob"));

    let salt_a = commit_with_weight(&mut w, &id, "alice", 40, 4);
    let _salt_b = commit_with_weight(&mut w, &id, "bob", 10, 9);
    w.clock.advance(VOTING_SECS);

    // A mismatched value or salt is rejected without consuming the
    // commitment; the correct pair still works afterwards.
    let err = w
        .engine
        .reveal_vote(&id, &alice, 5, &salt_a)
        .unwrap_err();
    assert_eq!(err, OracleError::InvalidReveal);
    let err = w
        .engine
        .reveal_vote(&id, &alice, 4, b"not-the-salt")
        .unwrap_err();
    assert_eq!(err, OracleError::InvalidReveal);
    w.engine.reveal_vote(&id, &alice, 4, &salt_a).unwrap();

    // Alice alone crosses quorum; Bob never revealed and forfeits.
    assert_eq!(w.engine.phase_of(&id).unwrap(), Phase::Resolved);
    assert!(w.engine.vote(&id, &bob).unwrap().forfeited);

    // His stake stays in the vault through settlement.
    let authority = w.authority.clone();
    w.engine.collect_fees(&authority, &id).unwrap();
    let err = w.engine.collect_voter_stake(&id, &bob).unwrap_err();
    assert!(matches!(err, OracleError::StakeForfeited(_)));

    // The resolution saw only Alice's weight.
    let proposal = w.engine.proposal(&id).unwrap();
    assert_eq!(proposal.revealed_weight, VoteWeight::new(40));
    assert_eq!(proposal.committed_weight, VoteWeight::new(50));
}

// ---------------------------------------------------------------------------
// 5. Weight snapshot cannot be moved after commit
// ---------------------------------------------------------------------------

#[test]
fn power_changes_after_commit_do_not_affect_tally_or_stake() {
    let mut w = world();
    let id = open_proposal(&mut w, "oracle uptime");
    let alice = participant("alice");

    let salt = commit_with_weight(&mut w, &id, "alice", 35, 4);
    let locked = w.engine.vote(&id, &alice).unwrap().locked_stake;
    assert_eq!(locked, StakeAmount::new(35));

    // Live power balloons between commit and reveal.
    w.power
        .set_weight(alice.clone(), VoteWeight::new(1_000_000));
    w.clock.advance(VOTING_SECS);
    w.engine.reveal_vote(&id, &alice, 4, &salt).unwrap();

    let proposal = w.engine.proposal(&id).unwrap();
    assert_eq!(proposal.revealed_weight, VoteWeight::new(35));
    assert_eq!(w.engine.vote(&id, &alice).unwrap().locked_stake, locked);
}

// ---------------------------------------------------------------------------
// 6. Corrections during the reveal window
// ---------------------------------------------------------------------------

#[test]
fn corrected_value_flows_into_resolution() {
    let mut w = world();
    let id = open_proposal(&mut w, "fee burn estimate");
    let (alice, bob) = (participant("alice"), participant("bob"));

    let salt_a = commit_with_weight(&mut w, &id, "alice", 20, 4);
    let salt_b = commit_with_weight(&mut w, &id, "bob", 15, 6);
    w.clock.advance(VOTING_SECS);

    w.engine.reveal_vote(&id, &alice, 4, &salt_a).unwrap();
    // Alice corrects her already-public value before quorum.
    w.engine.update_vote(&id, &alice, 10).unwrap();
    w.engine.reveal_vote(&id, &bob, 6, &salt_b).unwrap();

    let resolution = match w.engine.proposal(&id).unwrap().outcome.unwrap() {
        Outcome::Resolved(r) => r,
        Outcome::Expired => panic!("expected resolution"),
    };
    assert_eq!(resolution.weighted_sum, 20 * 10 + 15 * 6);
}

// ---------------------------------------------------------------------------
// 7. Persistence round-trip mid-lifecycle
// ---------------------------------------------------------------------------

#[test]
fn engine_state_survives_store_roundtrip() {
    let mut w = world();
    let id = open_proposal(&mut w, "restartable question");
    let alice = participant("alice");
    let salt = commit_with_weight(&mut w, &id, "alice", 35, 4);

    let store = MemoryStore::new();
    w.engine.save_to_store(&store).unwrap();

    // A fresh engine picks up where the old one stopped.
    let mut restored = OracleEngine::load_from_store(
        &store,
        w.power.clone(),
        w.vault.clone(),
        w.clock.clone(),
    )
    .unwrap();
    assert_eq!(restored.proposal(&id), w.engine.proposal(&id));

    w.clock.advance(VOTING_SECS);
    restored.reveal_vote(&id, &alice, 4, &salt).unwrap();
    assert_eq!(restored.phase_of(&id).unwrap(), Phase::Resolved);
}

// ---------------------------------------------------------------------------
// 8. Window edges
// ---------------------------------------------------------------------------

#[test]
fn deadlines_are_exclusive_of_the_boundary_second() {
    let mut w = world();
    let id = open_proposal(&mut w, "edge case question");
    let alice = participant("alice");
    w.power.set_weight(alice.clone(), VoteWeight::new(35));

    // Exactly at the voting deadline the commit window is closed.
    w.clock.advance(VOTING_SECS);
    let err = w
        .engine
        .submit_vote(&id, &alice, commit(4, b"s"))
        .unwrap_err();
    assert!(matches!(err, OracleError::VotingClosed { .. }));

    // Exactly at the reveal deadline the reveal window is closed.
    w.clock.advance(REVEAL_SECS);
    let err = w.engine.reveal_vote(&id, &alice, 4, b"s").unwrap_err();
    assert!(matches!(err, OracleError::NotRevealable(_)));
    assert_eq!(w.engine.phase_of(&id).unwrap(), Phase::Expired);
}
