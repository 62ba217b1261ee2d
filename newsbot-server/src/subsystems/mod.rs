pub mod embedder;
pub mod ingest;
pub mod keywords;
pub mod news;
pub mod respond;
pub mod retrieve;

#[cfg(test)]
pub(crate) mod test_support;
