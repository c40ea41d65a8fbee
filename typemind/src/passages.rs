//! Built-in passages for the placement assessment

use rand::{Rng, seq::SliceRandom};

const PASSAGES: [&str; 4] = [
    "The nurse checked the chart before the morning round. Each patient had a short note \
     about sleep, pain and appetite. She wrote down the new readings, asked a few questions \
     and moved on to the next bed with a calm and steady pace.",
    "A good habit takes a little time to build. Sit up straight, rest your fingers on the \
     home row and look at the screen instead of the keys. Speed will come on its own once \
     the movements feel natural and your mind is free to read ahead.",
    "The small library at the end of the street opens early on weekdays. Students come in \
     with coffee and laptops, find a quiet corner and work until lunch. The librarian knows \
     most of them by name and keeps the heating on when the winter gets cold.",
    "Clear notes save time for everyone who reads them later. Write short sentences, use \
     plain words and put the most important fact first. When a detail changes, update the \
     record right away so the next person on shift has the full picture.",
];

/// Pick a random passage
pub fn pick() -> &'static str {
    pick_with(&mut rand::thread_rng())
}

pub fn pick_with<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    PASSAGES.choose(rng).copied().unwrap_or(PASSAGES[0])
}
