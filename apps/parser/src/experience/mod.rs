// Experience parsing: chunking the experience section into jobs, then
// extracting title, company, dates and bullets from each chunk.

pub mod entry;
pub mod patterns;
pub mod splitter;
