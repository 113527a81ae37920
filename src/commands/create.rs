//! Create command handler
//!
//! Resolves a target, writes its files into the install directory and purges
//! consumed transient assets.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

use assetforge::domain::ports::ResolveEventSink;
use assetforge::infrastructure::{JsonEventSink, TracingEventSink};
use assetforge::{installer, CancellationToken, InstallResult, InstallUseCase};

pub struct CreateArgs {
    pub target: String,
    pub dir: PathBuf,
    pub state_dir: Option<PathBuf>,
    pub sequential: bool,
    pub no_purge: bool,
}

/// Execute the create command
pub fn cmd_create(args: CreateArgs, json: bool, cancellation: CancellationToken) -> Result<()> {
    let target = installer::target(&args.target)?;

    let mut options = super::install_options(&args.dir, args.state_dir, json)?
        .with_cancellation(cancellation);
    if args.sequential {
        options = options.with_parallel(false);
    }
    if args.no_purge {
        options = options.with_purge_transient(false);
    }

    let events: Arc<dyn ResolveEventSink> = if json {
        Arc::new(JsonEventSink::stdout())
    } else {
        Arc::new(TracingEventSink)
    };
    let use_case = InstallUseCase::new(Arc::new(installer::registry()?)).with_events(events);

    if json {
        crate::ui::json::emit(serde_json::json!({
            "event": "start",
            "command": "create",
            "target": target.name,
            "dir": args.dir.display().to_string(),
            "version": env!("CARGO_PKG_VERSION"),
        }))?;
    }

    let started = Instant::now();
    let result = use_case.execute(&target, &options)?;
    let duration_ms = started.elapsed().as_millis() as u64;

    if json {
        crate::ui::json::emit_with("complete", &result)?;
    } else {
        print!("{}", render_result(&result, &args.dir, duration_ms));
    }
    Ok(())
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_result(result: &InstallResult, dir: &Path, duration_ms: u64) -> String {
    let mut out = format!(
        "Created '{}' in {} ({} ms)\n",
        result.target,
        dir.display(),
        duration_ms
    );
    if !result.generated.is_empty() {
        out.push_str(&format!("  generated: {}\n", join(&result.generated)));
    }
    if !result.loaded.is_empty() {
        out.push_str(&format!("  reused:    {}\n", join(&result.loaded)));
    }
    out.push_str(&format!("  wrote {} file(s)\n", result.written.len()));
    if !result.purged.is_empty() {
        out.push_str(&format!("  purged:    {}\n", join(&result.purged)));
    }
    for failure in &result.purge_failures {
        out.push_str(&format!(
            "[WARN] could not purge '{}': {}\n",
            failure.kind, failure.message
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetforge::application::PurgeFailure;
    use assetforge::AssetKind;

    #[test]
    fn render_lists_every_section() {
        let mut result = InstallResult::new("cluster");
        result.generated = vec![AssetKind::from_static("bootstrap-payload")];
        result.loaded = vec![
            AssetKind::from_static("install-config"),
            AssetKind::from_static("manifests"),
        ];
        result.written = vec![PathBuf::from("/tmp/x/bootstrap.json")];
        result.purged = vec![AssetKind::from_static("bootstrap-token")];
        result.purge_failures = vec![PurgeFailure {
            kind: AssetKind::from_static("other"),
            message: "permission denied".into(),
        }];

        insta::assert_snapshot!(render_result(&result, Path::new("/tmp/x"), 12).trim_end(), @r"
        Created 'cluster' in /tmp/x (12 ms)
          generated: bootstrap-payload
          reused:    install-config, manifests
          wrote 1 file(s)
          purged:    bootstrap-token
        [WARN] could not purge 'other': permission denied
        ");
    }
}
