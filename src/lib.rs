pub mod core;
pub mod analysis;
pub mod compression;
pub mod index;
pub mod parallel;
pub mod query;
pub mod scoring;
pub mod storage;

/*
┌──────────────────────────── NEWSINDEX DATA FLOW ────────────────────────────┐
│                                                                             │
│  crawler fragments ──► storage::fragment::FragmentStore                     │
│        │                                                                    │
│        ▼                                                                    │
│  parallel::indexer::BatchIndexer ──(analysis::Analyzer)──►                  │
│  index::posting::PostingStore                                               │
│        │                                                                    │
│        ▼                                                                    │
│  storage::index_file (delta + LZ4 + CRC32) ──► child index files            │
│        │                                                                    │
│        ▼                                                                    │
│  index::manager::IndexManager::merge_global ──► global PostingStore         │
│                                                                             │
│  query text ──► query::compiler (lex, validate, Shunting-Yard)              │
│        │                                                                    │
│        ▼                                                                    │
│  query::evaluator (AND/OR/NOT, phrase, proximity)                           │
│  scoring::scorer (TF-IDF top-K)                                             │
│                                                                             │
└─────────────────────────────────────────────────────────────────────────────┘
*/
