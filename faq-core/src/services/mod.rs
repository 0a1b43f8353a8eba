pub mod authoring;
pub mod browser;
pub mod debounce;
pub mod encoding;
pub mod loader;
pub mod normalize;
pub mod search;
pub mod storage;
pub mod toc;
