pub mod statement_spans;
