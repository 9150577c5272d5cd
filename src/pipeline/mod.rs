//! Module copy pipeline
//!
//! Located → Copied → Scanned → Rendered → Finalized. Any stage may fail; a
//! failure aborts the run and leaves the destination as it is.

pub mod changes;
pub mod state;

pub use changes::ChangeSet;
pub use state::PipelineState;

use crate::config::{Config, OverwritePolicy};
use crate::context::SubstitutionContext;
use crate::copier::TreeCopier;
use crate::error::{Error, Result};
use crate::ignore::IgnoreSet;
use crate::locator::ModuleLocator;
use crate::renderer::TemplateRenderer;
use crate::template::{materialize, scan_templates, TemplateNaming};
use crate::vcs::SourceControl;
use log::{debug, error, info};
use std::fs;
use std::path::PathBuf;

/// Inputs of one pipeline run.
#[derive(Debug, Clone)]
pub struct CopyRequest {
    pub source_root: PathBuf,
    pub destination_root: PathBuf,
    pub module_name: String,
    pub provider_name: String,
    pub request_id: String,
    pub context: SubstitutionContext,
}

/// Terminal result of a run handed to source control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Changes were committed and pushed to `name`.
    Branch { name: String, changes: ChangeSet },
    /// The destination already matched; nothing was committed.
    NoChanges { changes: ChangeSet },
}

impl PipelineOutcome {
    pub fn branch(&self) -> Option<&str> {
        match self {
            Self::Branch { name, .. } => Some(name),
            Self::NoChanges { .. } => None,
        }
    }

    pub fn changes(&self) -> &ChangeSet {
        match self {
            Self::Branch { changes, .. } | Self::NoChanges { changes } => changes,
        }
    }
}

pub struct ModuleCopyPipeline<'a> {
    renderer: &'a dyn TemplateRenderer,
    naming: TemplateNaming,
    ignore: IgnoreSet,
    policy: OverwritePolicy,
}

impl<'a> ModuleCopyPipeline<'a> {
    pub fn new(renderer: &'a dyn TemplateRenderer, config: &Config) -> Result<Self> {
        Ok(Self {
            renderer,
            naming: TemplateNaming::from_config(&config.templates),
            ignore: IgnoreSet::new(&config.templates.ignore)?,
            policy: config.overwrite,
        })
    }

    pub fn with_policy(mut self, policy: OverwritePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Runs every stage up to and including Rendered.
    pub fn copy_and_render(&self, request: &CopyRequest) -> Result<ChangeSet> {
        let mut state = PipelineState::Started;
        self.stages(request, &mut state).inspect_err(|e| {
            error!("Pipeline for {} failed after '{state}': {e}", request.request_id);
        })
    }

    fn stages(&self, request: &CopyRequest, state: &mut PipelineState) -> Result<ChangeSet> {
        let location = ModuleLocator::new(&self.ignore).locate(
            &request.source_root,
            &request.module_name,
            &request.provider_name,
        )?;
        advance(state);

        let destination_root = &request.destination_root;
        fs::create_dir_all(destination_root).map_err(|e| Error::DestinationCreateFailed {
            path: destination_root.clone(),
            source: e,
        })?;
        let copied = TreeCopier::new(self.policy, &self.ignore)
            .copy_tree(&location.provider_path, destination_root)?;
        info!(
            "Copied {} file(s) from {} to {}",
            copied.len(),
            location.provider_path.display(),
            destination_root.display()
        );
        advance(state);

        let templates = scan_templates(destination_root, &self.naming, &self.ignore)?;
        if templates.is_empty() {
            debug!("No templated files under {}", destination_root.display());
        }
        advance(state);

        let mut rendered = Vec::with_capacity(templates.len());
        for template in &templates {
            // Scanned paths are files below the destination, so both are present.
            let (Some(dir), Some(file_name)) =
                (template.parent(), template.file_name().and_then(|n| n.to_str()))
            else {
                continue;
            };
            let Some(output_name) = self.naming.output_name(file_name, &request.request_id)
            else {
                continue;
            };
            rendered.push(materialize(
                self.renderer,
                dir,
                file_name,
                dir,
                &output_name,
                &request.context,
                self.policy,
            )?);
        }
        advance(state);

        Ok(ChangeSet { destination_root: destination_root.clone(), location, copied, rendered })
    }

    /// Full run: checkout `branch`, copy and render, then commit and push.
    pub fn run<S: SourceControl>(
        &self,
        scm: &S,
        handle: &S::Handle,
        branch: &str,
        request: &CopyRequest,
    ) -> Result<PipelineOutcome> {
        let branch = scm.checkout(handle, branch)?;
        let changes = self.copy_and_render(request)?;

        let mut state = PipelineState::Rendered;
        advance(&mut state);

        let message = format!(
            "Add {} {} module for {}",
            request.provider_name, request.module_name, request.request_id
        );
        let committed = scm
            .commit(handle, &request.destination_root, &message)
            .inspect_err(|e| error!("Commit for {} failed: {e}", request.request_id))?;
        if !committed {
            info!("No changes to commit for {}", request.request_id);
            return Ok(PipelineOutcome::NoChanges { changes });
        }

        scm.push(handle, &branch)
            .inspect_err(|e| error!("Push of {branch} failed: {e}"))?;
        info!("Pushed {branch}");
        Ok(PipelineOutcome::Branch { name: branch, changes })
    }
}

/// Steps to the following state; Finalized is terminal.
fn advance(state: &mut PipelineState) {
    if let Some(to) = state.next() {
        debug!("Pipeline state: {state} -> {to}");
        *state = to;
    }
}
