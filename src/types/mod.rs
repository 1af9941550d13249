mod condition;
mod config;
mod group;
mod operator;
mod rule;
mod value;

pub use condition::Condition;
pub use config::{Controls, EditorConfig, Templates};
pub use group::Group;
pub use operator::LogicOperator;
pub use rule::Rule;
pub use value::Value;
