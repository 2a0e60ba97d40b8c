pub mod fragment;
pub mod index_file;
pub mod queries;
pub mod stopwords;
