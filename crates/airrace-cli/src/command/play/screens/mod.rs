pub use self::{dogfight::DogfightScreen, rules::RulesScreen};

mod dogfight;
mod rules;
