mod import_topics_use_case;

pub use import_topics_use_case::{ImportRunError, ImportTopicsUseCase, RowBatch};
