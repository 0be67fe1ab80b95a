use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Supplies the text bodies the producer loop publishes.
pub trait PayloadGenerator {
    fn next(&mut self) -> String;
}

const LOREM_WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "diam",
    "nonummy", "nibh", "euismod", "tincidunt", "laoreet", "magna", "aliquam", "erat", "volutpat",
    "veniam", "quis", "nostrud", "exerci", "tation", "ullamcorper", "suscipit", "lobortis",
];

/// Generates random lorem-style sentences.
#[derive(Debug)]
pub struct LoremGenerator {
    rng: StdRng,
}

impl Default for LoremGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl LoremGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl PayloadGenerator for LoremGenerator {
    fn next(&mut self) -> String {
        let word_count = self.rng.gen_range(4..=9);
        let mut sentence = String::new();
        for i in 0..word_count {
            let word = LOREM_WORDS[self.rng.gen_range(0..LOREM_WORDS.len())];
            if i == 0 {
                let mut chars = word.chars();
                if let Some(first) = chars.next() {
                    sentence.push(first.to_ascii_uppercase());
                    sentence.push_str(chars.as_str());
                }
            } else {
                sentence.push(' ');
                sentence.push_str(word);
            }
        }
        sentence.push('.');
        sentence
    }
}
