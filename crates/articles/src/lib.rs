//! Articles domain module.

pub mod article;

pub use article::{Article, ArticlePatch, NewArticle};
