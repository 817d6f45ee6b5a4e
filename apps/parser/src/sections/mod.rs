// Section segmentation: header classification (table, cache, external
// fallback) and slicing of the document into canonical sections.

pub mod cache;
pub mod classifier;
pub mod llm_fallback;
pub mod segmenter;
pub mod table;
