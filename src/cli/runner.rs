use crate::{
    cli::{CopyArgs, ProvisionArgs, Response},
    config::{Config, OverwritePolicy},
    context::SubstitutionContext,
    error::{Error, Result},
    ioutils::{read_arg_or_stdin, read_file_or_stdin},
    loader::ModuleSource,
    pipeline::{ChangeSet, CopyRequest, ModuleCopyPipeline, PipelineOutcome},
    renderer::MiniJinjaRenderer,
    request::{CatalogAction, CatalogEvent, ProvisionRequest},
    vcs::{GitSourceControl, SourceControl},
    workspace::WorkingDirectory,
};
use log::{debug, info, warn};
use std::path::Path;

/// Loads the explicit config file, or the one in the current directory.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)?,
        None => Config::load_config(std::env::current_dir()?)?,
    };
    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Copies and renders one module into a local directory.
pub fn run_copy(args: &CopyArgs) -> Result<ChangeSet> {
    let config = load_config(args.config.as_deref())?;
    let context = match &args.context {
        Some(value) => SubstitutionContext::from_json_str(&read_arg_or_stdin(value)?)?,
        None => SubstitutionContext::new(),
    };
    let policy = if args.strict { OverwritePolicy::Strict } else { config.overwrite };

    let scm = GitSourceControl::new(&config.scm);
    let work = WorkingDirectory::acquire(config.work_dir(), &args.request_id)?;
    let source_root = ModuleSource::from_string(&args.source).load(&scm, &work.source_dir())?;

    let renderer = MiniJinjaRenderer::new();
    let pipeline = ModuleCopyPipeline::new(&renderer, &config)?.with_policy(policy);
    let changes = pipeline.copy_and_render(&CopyRequest {
        source_root,
        destination_root: args.destination.clone(),
        module_name: args.module.clone(),
        provider_name: args.provider.clone(),
        request_id: args.request_id.clone(),
        context,
    })?;

    work.close()?;
    Ok(changes)
}

/// Handles a catalog event: clone both repositories, run the pipeline into
/// the environment directory of the project, then commit and push.
pub fn run_provision(args: &ProvisionArgs) -> Result<Response> {
    let config = load_config(args.config.as_deref())?;
    let event = CatalogEvent::from_json_str(&read_file_or_stdin(&args.event)?)?;

    let request = match event.action(&config)? {
        CatalogAction::Delete => {
            info!("Delete request received, nothing to provision");
            return Ok(Response::success("Nothing to provision for a delete request", None));
        }
        CatalogAction::Provision(request) => request,
    };

    let source = args
        .source_repo
        .clone()
        .or_else(|| config.source.repository.clone())
        .ok_or_else(|| {
            Error::ConfigValidation("no module source repository was configured".into())
        })?;

    let scm = GitSourceControl::new(&config.scm);
    let work = WorkingDirectory::acquire(config.work_dir(), &request.request_id)?;
    let result = Provisioner { config: &config, scm: &scm, work: &work }.provision(
        &ModuleSource::from_string(&source),
        &args.target_repo,
        request,
    );

    if let Err(e) = work.close() {
        warn!("Failed to remove working directory: {e}");
    }
    result
}

struct Provisioner<'a, S: SourceControl> {
    config: &'a Config,
    scm: &'a S,
    work: &'a WorkingDirectory,
}

impl<S: SourceControl> Provisioner<'_, S> {
    fn provision(
        &self,
        source: &ModuleSource,
        target_repo: &str,
        request: ProvisionRequest,
    ) -> Result<Response> {
        info!(
            "Provisioning {}/{} for {} into {}",
            request.module_name, request.provider_name, request.request_id, request.environment_dir
        );

        let source_root = source.load(self.scm, &self.work.source_dir())?;
        let project_dir = self.work.project_dir();
        let handle = self.scm.clone_repo(target_repo, &project_dir)?;
        debug!("Project cloned to {}", project_dir.display());

        let renderer = MiniJinjaRenderer::new();
        let pipeline = ModuleCopyPipeline::new(&renderer, self.config)?;
        let branch = self.config.scm.branch_name(&request.request_id);
        let copy_request = CopyRequest {
            source_root,
            destination_root: project_dir.join(&request.environment_dir),
            module_name: request.module_name,
            provider_name: request.provider_name,
            request_id: request.request_id.clone(),
            context: request.context,
        };

        let response = match pipeline.run(self.scm, &handle, &branch, &copy_request)? {
            PipelineOutcome::Branch { name, .. } => Response::success(
                format!("Code for {} pushed to {name}", request.request_id),
                Some(name),
            ),
            PipelineOutcome::NoChanges { .. } => Response::success(
                format!("No code to merge to {target_repo} for {}", request.request_id),
                None,
            ),
        };
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_config_file_is_validated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("iac-scaffold.yaml");
        fs::write(&path, "templates:\n  markers: []\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, Error::ConfigValidation(_)));
    }

    #[test]
    fn copy_renders_a_local_source() {
        let source = TempDir::new().unwrap();
        let destination = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        let provider = source.path().join("modules/s3/terraform");
        fs::create_dir_all(&provider).unwrap();
        fs::write(provider.join("main.tf.jinja"), "bucket = \"{{ bucket | kebab_case }}\"")
            .unwrap();

        let config = work.path().join("iac-scaffold.json");
        fs::write(
            &config,
            serde_json::json!({"work_dir": work.path().join("runs")}).to_string(),
        )
        .unwrap();

        let args = CopyArgs {
            source: source.path().to_string_lossy().into_owned(),
            destination: destination.path().to_path_buf(),
            module: "s3".into(),
            provider: "terraform".into(),
            request_id: "req9".into(),
            context: Some("{\"bucket\":\"AppLogs\"}".into()),
            config: Some(config),
            strict: false,
            verbose: 0,
        };

        let changes = run_copy(&args).unwrap();
        assert_eq!(changes.files(), vec![std::path::PathBuf::from("req9-main.tf")]);
        assert_eq!(
            fs::read_to_string(destination.path().join("req9-main.tf")).unwrap(),
            "bucket = \"app-logs\""
        );
    }

    #[test]
    fn delete_event_short_circuits() {
        let dir = TempDir::new().unwrap();
        let event = dir.path().join("event.json");
        fs::write(&event, "{\"RequestType\":\"Delete\"}").unwrap();
        let config = dir.path().join("iac-scaffold.json");
        fs::write(&config, "{}").unwrap();

        let response = run_provision(&ProvisionArgs {
            event,
            target_repo: "unused".into(),
            source_repo: None,
            config: Some(config),
            verbose: 0,
        })
        .unwrap();
        assert!(response.is_success());
    }
}
