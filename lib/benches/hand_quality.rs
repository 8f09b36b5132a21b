#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};
use decksmith::deck::CardCounts;
use decksmith::simulation::{hand_quality, simulate_match, MatchConfig, HAND_SIZE};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn gruul() -> CardCounts {
    let mut deck = CardCounts::new();
    deck.add("Mountain", 12);
    deck.add("Forest", 12);
    for i in 0..36 {
        deck.add(&format!("Creature {}", i), 1);
    }
    deck
}

fn criterion_function(c: &mut Criterion) {
    let deck = gruul();
    let mut rng = SmallRng::seed_from_u64(48388);
    c.bench_function("hand_quality 60 cards", |b| {
        b.iter(|| hand_quality(&mut rng, black_box(&deck), HAND_SIZE))
    });
    let config = MatchConfig::default();
    c.bench_function("simulate_match 1000 games", |b| {
        b.iter(|| simulate_match(&mut rng, black_box(&deck), black_box(&deck), &config))
    });
}

criterion_group!(benches, criterion_function);
criterion_main!(benches);
