use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::core::config::{ContentDirectory, SyncSettings};
use crate::core::error::{SyncError, SyncResult};
use crate::core::http::build_http_client;
use crate::core::record::{ContentType, SyncDescriptor};
use crate::core::registry::{ModrinthClient, RemoteResolver};
use crate::core::scanner::LocalScanner;

#[derive(Debug, Parser)]
#[command(name = "modsync", version)]
#[command(about = "Generate sync descriptors for Minecraft content", long_about = None)]
pub struct Cli {
    /// Settings file (JSON). Must exist when given.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Pretty-print the written descriptor
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve registry version ids into a descriptor
    Remote {
        /// File with one version id per line
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,

        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Registry API base URL
        #[arg(long, value_name = "URL")]
        registry_url: Option<String>,
    },

    /// Scan directories of .jar/.zip archives into a descriptor
    Local {
        /// Directory to scan, optionally with a URL correction (repeatable)
        #[arg(long = "dir", value_name = "PATH[=CORRECTION]")]
        dirs: Vec<ContentDirectory>,

        /// Public URL the archives are served under
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,

        /// Treat archives with only a MANIFEST.MF as mods
        #[arg(long)]
        accept_legacy: bool,

        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Decode an existing descriptor and summarize it
    Inspect { file: PathBuf },
}

pub async fn execute(cli: Cli) -> SyncResult<()> {
    match &cli.command {
        Command::Inspect { file } => inspect(file).await,
        Command::Remote { .. } => remote(&layered_settings(&cli)?).await,
        Command::Local { .. } => local(&layered_settings(&cli)?).await,
    }
}

/// Settings file first, then whatever the command line sets.
pub fn layered_settings(cli: &Cli) -> SyncResult<SyncSettings> {
    let mut settings = SyncSettings::load(cli.config.as_deref())?;
    apply_overrides(&mut settings, cli);
    settings.validate()?;
    Ok(settings)
}

fn apply_overrides(settings: &mut SyncSettings, cli: &Cli) {
    settings.pretty |= cli.pretty;

    match &cli.command {
        Command::Remote {
            input,
            output,
            registry_url,
        } => {
            if let Some(input) = input {
                settings.input = input.clone();
            }
            if let Some(output) = output {
                settings.output = output.clone();
            }
            if let Some(url) = registry_url {
                settings.registry_url = url.clone();
            }
        }
        Command::Local {
            dirs,
            base_url,
            accept_legacy,
            output,
        } => {
            if !dirs.is_empty() {
                settings.directories = dirs.clone();
            }
            if let Some(url) = base_url {
                settings.base_url = url.clone();
            }
            settings.accept_legacy_manifests |= *accept_legacy;
            if let Some(output) = output {
                settings.output = output.clone();
            }
        }
        Command::Inspect { .. } => {}
    }
}

// ─── Remote ───

pub async fn remote(settings: &SyncSettings) -> SyncResult<()> {
    let text = tokio::fs::read_to_string(&settings.input)
        .await
        .map_err(SyncError::io(&settings.input))?;
    let ids = parse_version_ids(&text);
    info!("Resolving {} version ids from {:?}", ids.len(), settings.input);

    let http = build_http_client(settings.request_timeout())?;
    let registry = ModrinthClient::new(http, &settings.registry_url)?;
    let records = RemoteResolver::new(&registry).resolve(&ids).await;

    if records.len() < ids.len() {
        warn!("{} version ids produced no record", ids.len() - records.len());
    }

    SyncDescriptor::new(records)
        .save(&settings.output, settings.pretty)
        .await
}

/// One id per line. Whitespace is trimmed; blank lines and `#` comments are skipped.
pub fn parse_version_ids(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

// ─── Local ───

pub async fn local(settings: &SyncSettings) -> SyncResult<()> {
    let corrector = settings.corrector()?;
    let scanner = LocalScanner::new(&corrector, settings.accept_legacy_manifests);
    let report = scanner.scan(&settings.directories);

    info!(
        "Scan finished: {} resolved, {} skipped, {} directories unreadable",
        report.resolved, report.skipped, report.failed_directories
    );

    report
        .descriptor
        .save(&settings.output, settings.pretty)
        .await
}

// ─── Inspect ───

pub async fn inspect(path: &Path) -> SyncResult<()> {
    let descriptor = SyncDescriptor::load(path).await?;
    info!(
        "{:?}: sync_version {}, {} records",
        path,
        descriptor.schema_version,
        descriptor.len()
    );
    for content_type in ContentType::ALL {
        info!("  {}: {}", content_type, descriptor.count_of(content_type));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::archive::package::tests::build_zip;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("modsync-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn version_ids_skip_blanks_and_comments() {
        let ids = parse_version_ids("  V1  \n\n# pinned\nV2\r\n   \n");
        assert_eq!(ids, vec!["V1", "V2"]);
    }

    #[test]
    fn cli_overrides_settings_file() {
        let cli = Cli::parse_from([
            "modsync",
            "--pretty",
            "local",
            "--dir",
            "./mods",
            "--dir",
            "./backup=/old",
            "--base-url",
            "https://cdn.example.org/mc",
            "--accept-legacy",
        ]);
        let mut settings = SyncSettings::default();
        apply_overrides(&mut settings, &cli);

        assert!(settings.pretty);
        assert!(settings.accept_legacy_manifests);
        assert_eq!(settings.base_url, "https://cdn.example.org/mc");
        assert_eq!(settings.directories.len(), 2);
        assert_eq!(settings.directories[1].correction, "/old");
        assert_eq!(settings.output, PathBuf::from("sync.json"));
    }

    #[test]
    fn remote_flags_parse() {
        let cli = Cli::parse_from([
            "modsync",
            "remote",
            "--input",
            "ids.txt",
            "--registry-url",
            "http://localhost:9000/v2/",
            "-v",
        ]);
        assert!(cli.verbose);
        let mut settings = SyncSettings::default();
        apply_overrides(&mut settings, &cli);
        assert_eq!(settings.input, PathBuf::from("ids.txt"));
        assert_eq!(settings.registry_url, "http://localhost:9000/v2/");
    }

    #[tokio::test]
    async fn remote_writes_descriptor() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/versions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "id": "V1",
                    "project_id": "P1",
                    "loaders": ["fabric"],
                    "files": [{"url": "https://cdn.example/sodium.jar", "primary": true}]
                }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "P1", "title": "Sodium", "slug": "sodium"}
            ])))
            .mount(&server)
            .await;

        let dir = temp_dir("remote");
        std::fs::write(dir.join("versions.txt"), "V1\nV2\n").unwrap();
        let settings = SyncSettings {
            input: dir.join("versions.txt"),
            output: dir.join("out").join("sync.json"),
            registry_url: format!("{}/v2/", server.uri()),
            ..SyncSettings::default()
        };

        remote(&settings).await.unwrap();

        let written = SyncDescriptor::load(&settings.output).await.unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written.records[0].name, "Sodium");
        assert_eq!(written.records[0].version, "V1");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn remote_registry_failure_still_writes_empty_descriptor() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let dir = temp_dir("remote-fail");
        std::fs::write(dir.join("versions.txt"), "V1\n").unwrap();
        let settings = SyncSettings {
            input: dir.join("versions.txt"),
            output: dir.join("sync.json"),
            registry_url: format!("{}/v2/", server.uri()),
            ..SyncSettings::default()
        };

        remote(&settings).await.unwrap();

        let written = SyncDescriptor::load(&settings.output).await.unwrap();
        assert!(written.is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn remote_missing_input_is_fatal() {
        let dir = temp_dir("remote-missing");
        let settings = SyncSettings {
            input: dir.join("nope.txt"),
            output: dir.join("sync.json"),
            ..SyncSettings::default()
        };

        let err = remote(&settings).await.unwrap_err();
        assert!(matches!(err, SyncError::Io { .. }));
        assert!(!settings.output.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn local_scan_writes_descriptor() {
        let dir = temp_dir("local");
        let mods = dir.join("mods");
        std::fs::create_dir_all(&mods).unwrap();
        std::fs::write(
            mods.join("sodium.jar"),
            build_zip(&[("fabric.mod.json", r#"{"name":"Sodium","version":"0.5.8"}"#)]),
        )
        .unwrap();
        std::fs::write(mods.join("notes.txt"), "ignored").unwrap();

        let settings = SyncSettings {
            output: dir.join("sync.json"),
            base_url: "https://cdn.example.org/mc".into(),
            directories: vec![ContentDirectory {
                path: mods.clone(),
                correction: "mods".into(),
            }],
            ..SyncSettings::default()
        };

        local(&settings).await.unwrap();

        let written = SyncDescriptor::load(&settings.output).await.unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written.records[0].url, "https://cdn.example.org/mc/mods/sodium.jar");
        assert_eq!(written.records[0].content_type, ContentType::Mod);

        inspect(&settings.output).await.unwrap();

        let _ = std::fs::remove_dir_all(&dir);
    }
}
