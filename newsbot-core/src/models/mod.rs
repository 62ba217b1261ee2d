pub mod article;
pub mod skill;

pub use article::{Article, EmbeddedArticle, SimilarityResult};
pub use skill::{ReplyEnvelope, SkillRequest};
