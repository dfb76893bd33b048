//! Test Module
//!
//! Cross-module suites for the EcoSea engine.
//!
//! ## Test Categories
//! - `scenario_tests`: End-to-end question/answer behavior on a sample knowledge base
//! - `engine_tests`: Loading errors, build-once initialization, shared access
//! - `actor_tests`: RAG actor, answer cache, reload and the chat supervisor

pub mod actor_tests;

use std::io::Write;
use tempfile::NamedTempFile;

/// Small knowledge base covering reporting, impact, travel and boilerplate lines.
pub const SAMPLE_KB: &str = "\
EcoSea adalah aplikasi untuk melaporkan sampah di pantai dan membantu menjaga kebersihan pesisir.
Pengguna bisa mengirim foto, lokasi, dan detail kondisi pantai secara langsung.

Muara sungai sering menjadi titik kumpul sampah kiriman, terutama saat hujan deras dan rob.
Sampah plastik dari pemukiman terbawa arus sungai lalu menumpuk di muara.

Lokasi pantai: Pantai Alam Indah (PAI) di Kota Tegal.

Plastik yang terbawa ke laut dapat terurai menjadi mikroplastik dan membahayakan biota laut seperti penyu dan ikan.
Ekosistem mangrove dan lamun juga ikut rusak kalau sampah dibiarkan.

Wisata pantai di Pantura cukup beragam, mulai dari Pantai Alam Indah sampai Pantai Purwahamba Indah.
Pengunjung diharapkan membawa pulang sampahnya sendiri supaya pantai tetap bersih.
";

/// Writes `contents` to a fresh temporary file kept alive by the returned handle.
pub fn kb_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp kb");
    file.write_all(contents.as_bytes()).expect("write temp kb");
    file.flush().expect("flush temp kb");
    file
}
