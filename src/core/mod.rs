// ─── modsync Core ───
// Builds sync descriptors for a Minecraft client from two sources: registry
// version ids, or archives sitting in directories that are served over HTTP.
//
// Architecture:
//   core/
//     record/     Descriptor document + content records
//     archive/    Zip member index + manifest precedence table
//     extract/    Manifest parsers (mod JSON, mods.toml, MANIFEST.MF)
//     hosting/    Public URL construction for scanned archives
//     scanner/    Local producer: directories → descriptor
//     registry/   Remote producer: version ids → descriptor
//     config/     Settings file + CLI layering
//     http/       Shared reqwest client

pub mod archive;
pub mod config;
pub mod error;
pub mod extract;
pub mod hosting;
pub mod http;
pub mod record;
pub mod registry;
pub mod scanner;
