pub mod extract_shared_chunks;
