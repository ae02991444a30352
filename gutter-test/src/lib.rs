// Integration test utilities and fixture management for gutter.

use std::path::{Path, PathBuf};

use gutter_core::config::{CONFIG_FILE_NAME, GutterConfig};
use gutter_core::error::RenderError;
use gutter_core::host::{CollectingSink, IconSink, MemorySource, RenderedIcon};
use gutter_core::merge::MergePolicy;
use gutter_core::pipeline::{GutterPipeline, PassResult};

/// Absolute path of a file under `gutter-test/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures").join(name)
}

pub fn load_fixture(name: &str) -> MemorySource {
    MemorySource::from_json_file(&fixture_path(name)).expect("load fixture")
}

pub fn pipeline_with(policy: MergePolicy) -> GutterPipeline {
    let mut config = GutterConfig::default();
    config.merge.policy = policy;
    GutterPipeline::from_config(&config)
}

/// Run every pass of a fixture, snapshotting the sink after each one.
pub fn run_fixture(name: &str, policy: MergePolicy) -> Vec<(PassResult, Vec<RenderedIcon>)> {
    let mut source = load_fixture(name);
    let pipeline = pipeline_with(policy);
    let mut sink = CollectingSink::new();
    let mut passes = Vec::new();
    while let Some(result) = pipeline.run_pass(&mut source, &mut sink) {
        passes.push((result, sink.icons().to_vec()));
    }
    passes
}

/// Compact `line:labels` rendering of a pass, e.g. `3:c14,n96`.
pub fn summarize(icons: &[RenderedIcon]) -> Vec<String> {
    icons
        .iter()
        .map(|r| format!("{}:{}", r.line, r.icon.labels().join(",")))
        .collect()
}

/// A sink that refuses icons on chosen gutter lines, as a folded region would.
#[derive(Debug, Default)]
pub struct FoldingSink {
    pub folded_lines: Vec<u32>,
    pub shown: Vec<RenderedIcon>,
}

impl FoldingSink {
    pub fn folding(lines: &[u32]) -> Self {
        Self {
            folded_lines: lines.to_vec(),
            shown: Vec::new(),
        }
    }
}

impl IconSink for FoldingSink {
    fn begin_pass(&mut self) {
        self.shown.clear();
    }

    fn accept(&mut self, icon: RenderedIcon) -> Result<(), RenderError> {
        if self.folded_lines.contains(&icon.line) {
            return Err(RenderError::Sink(format!("line {} is folded", icon.line)));
        }
        self.shown.push(icon);
        Ok(())
    }
}

/// A temporary directory holding a `gutter.toml`.
#[derive(Debug)]
pub struct TestWorkspace {
    pub dir: tempfile::TempDir,
}

impl TestWorkspace {
    pub fn with_config(config: &GutterConfig) -> Self {
        let dir = tempfile::tempdir().expect("create tempdir");
        let content = config.to_toml_string().expect("serialize config");
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), content).expect("write config");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join(CONFIG_FILE_NAME)
    }

    /// Write a findings document next to the config.
    pub fn write_findings(&self, name: &str, findings: &serde_json::Value) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, findings.to_string()).expect("write findings");
        path
    }
}
