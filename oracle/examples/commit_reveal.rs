//! Walks one proposal through the full commit-reveal lifecycle and prints
//! the resolution. Run with `RUST_LOG=debug` to watch the engine's tracing.

use std::sync::Arc;
use verdict_crypto::{commit, random_salt};
use verdict_oracle::{
    ConfigPatch, ManualClock, MemoryVault, OracleEngine, Outcome, StaticPowerOracle,
};
use verdict_types::{ParticipantId, StakeAmount, Timestamp, TokenMint, VoteWeight};

fn main() {
    verdict_utils::init_tracing();

    let clock = Arc::new(ManualClock::new(Timestamp::new(1_700_000_000)));
    let power = Arc::new(StaticPowerOracle::new());
    let vault = Arc::new(MemoryVault::new());
    let mut engine = OracleEngine::new(power.clone(), vault, clock.clone());

    let mint = TokenMint::new("mint_usdv");
    let authority = ParticipantId::new("vdt_authority");
    engine
        .initialize_config(mint.clone(), authority.clone())
        .expect("initialize config");

    // Proposals snapshot their parameters at creation, so lower the quorum
    // first (config updates are addressed through a proposal on the mint).
    let proposer = ParticipantId::new("vdt_proposer");
    let bootstrap = engine
        .create_proposal(&mint, &proposer, "bootstrap", "", StakeAmount::new(3_000_000))
        .expect("bootstrap proposal");
    engine
        .update_config(
            &bootstrap,
            &authority,
            &ConfigPatch {
                required_votes: Some(VoteWeight::new(30)),
                ..Default::default()
            },
        )
        .expect("update config");

    let proposal = engine
        .create_proposal(
            &mint,
            &proposer,
            "eth/usd close 2026-01-01",
            "closing price in whole dollars",
            StakeAmount::new(3_000_000),
        )
        .expect("create proposal");

    let alice = ParticipantId::new("vdt_alice");
    let bob = ParticipantId::new("vdt_bob");
    power.set_weight(alice.clone(), VoteWeight::new(20));
    power.set_weight(bob.clone(), VoteWeight::new(15));

    let salt_a = random_salt();
    let salt_b = random_salt();
    engine
        .submit_vote(&proposal, &alice, commit(3_120, &salt_a))
        .expect("alice commits");
    engine
        .submit_vote(&proposal, &bob, commit(3_150, &salt_b))
        .expect("bob commits");

    clock.advance(86_400); // past the voting deadline
    engine
        .reveal_vote(&proposal, &alice, 3_120, &salt_a)
        .expect("alice reveals");
    engine
        .reveal_vote(&proposal, &bob, 3_150, &salt_b)
        .expect("bob reveals");

    match engine.proposal(&proposal).and_then(|p| p.outcome) {
        Some(Outcome::Resolved(resolution)) => {
            println!(
                "resolved: mean = {:.4} over {} revealed weight",
                resolution.mean_f64().unwrap_or_default(),
                resolution.total_weight,
            );
        }
        other => println!("not resolved: {other:?}"),
    }

    let fee = engine
        .collect_fees(&authority, &proposal)
        .expect("collect fees");
    println!("protocol fee collected: {fee}");
}
