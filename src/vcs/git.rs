use crate::config::ScmConfig;
use crate::error::{Error, Result};
use crate::vcs::SourceControl;
use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{
    BranchType, Cred, CredentialType, ErrorCode, FetchOptions, IndexAddOption, PushOptions,
    RemoteCallbacks, Repository, Signature,
};
use log::debug;
use std::cell::Cell;
use std::path::Path;

/// Gives up after this many credential callbacks for one operation.
const MAX_CREDENTIAL_ATTEMPTS: usize = 3;

/// [`SourceControl`] backed by libgit2.
pub struct GitSourceControl {
    remote: String,
    author_name: String,
    author_email: String,
    token: Option<String>,
}

impl GitSourceControl {
    pub fn new(config: &ScmConfig) -> Self {
        Self {
            remote: config.remote.clone(),
            author_name: config.author_name.clone(),
            author_email: config.author_email.clone(),
            token: config.token.clone(),
        }
    }

    /// Token first, then the SSH agent, then libgit2's defaults.
    fn callbacks(&self) -> RemoteCallbacks<'_> {
        let attempts = Cell::new(0usize);
        let token = self.token.as_deref();
        let mut callbacks = RemoteCallbacks::new();

        callbacks.credentials(move |_url, username_from_url, allowed_types| {
            attempts.set(attempts.get() + 1);
            if attempts.get() > MAX_CREDENTIAL_ATTEMPTS {
                return Err(git2::Error::from_str("authentication failed"));
            }
            match token {
                Some(token) if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) => {
                    Cred::userpass_plaintext("x-access-token", token)
                }
                _ if allowed_types.contains(CredentialType::SSH_KEY) => {
                    Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
                }
                _ => Cred::default(),
            }
        });
        callbacks
    }

    fn signature(&self) -> std::result::Result<Signature<'static>, git2::Error> {
        Signature::now(&self.author_name, &self.author_email)
    }

    /// Pathspec for `path` relative to the working tree root.
    fn pathspec(repo: &Repository, path: &Path) -> std::result::Result<String, git2::Error> {
        let workdir =
            repo.workdir().ok_or_else(|| git2::Error::from_str("repository has no working tree"))?;
        // libgit2 resolves symlinks in the workdir, callers may not have.
        let canonical = path.canonicalize().ok().zip(workdir.canonicalize().ok());
        let relative = match path.strip_prefix(workdir) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => canonical
                .and_then(|(path, workdir)| {
                    path.strip_prefix(&workdir).ok().map(Path::to_path_buf)
                })
                .ok_or_else(|| {
                    git2::Error::from_str(&format!(
                        "'{}' is outside the working tree",
                        path.display()
                    ))
                })?,
        };

        let spec = relative.to_string_lossy().replace('\\', "/");
        Ok(if spec.is_empty() { "*".to_string() } else { spec })
    }

    fn stage_and_commit(
        &self,
        repo: &Repository,
        path: &Path,
        message: &str,
    ) -> std::result::Result<bool, git2::Error> {
        let spec = Self::pathspec(repo, path)?;
        let mut index = repo.index()?;
        index.add_all([spec.as_str()].iter(), IndexAddOption::DEFAULT, None)?;
        index.update_all([spec.as_str()].iter(), None)?;
        index.write()?;
        let tree_id = index.write_tree()?;

        let parent = match repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if e.code() == ErrorCode::UnbornBranch => None,
            Err(e) => return Err(e),
        };

        let unchanged = match &parent {
            Some(parent) => parent.tree_id() == tree_id,
            None => index.is_empty(),
        };
        if unchanged {
            debug!("Nothing to commit under {}", path.display());
            return Ok(false);
        }

        let tree = repo.find_tree(tree_id)?;
        let signature = self.signature()?;
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        let oid = repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
        debug!("Created commit {oid}");
        Ok(true)
    }

    fn switch_branch(
        &self,
        repo: &Repository,
        branch: &str,
    ) -> std::result::Result<(), git2::Error> {
        let refname = format!("refs/heads/{branch}");

        if repo.find_branch(branch, BranchType::Local).is_err() {
            let remote_branch = format!("{}/{branch}", self.remote);
            let base = match repo.find_branch(&remote_branch, BranchType::Remote) {
                Ok(existing) => Some(existing.get().peel_to_commit()?),
                Err(_) => match repo.head() {
                    Ok(head) => Some(head.peel_to_commit()?),
                    Err(e) if e.code() == ErrorCode::UnbornBranch => None,
                    Err(e) => return Err(e),
                },
            };

            match base {
                Some(commit) => {
                    debug!("Creating branch {branch} at {}", commit.id());
                    repo.branch(branch, &commit, false)?;
                }
                // Empty repository: the first commit creates the branch.
                None => {
                    debug!("Repository is empty, {branch} starts unborn");
                    return repo.set_head(&refname);
                }
            }
        }

        repo.set_head(&refname)?;
        repo.checkout_head(Some(CheckoutBuilder::new().safe()))
    }
}

impl SourceControl for GitSourceControl {
    type Handle = Repository;

    fn clone_repo(&self, repository: &str, local_path: &Path) -> Result<Repository> {
        debug!("Cloning '{repository}' to '{}'", local_path.display());

        let mut fetch_opts = FetchOptions::new();
        fetch_opts.remote_callbacks(self.callbacks());

        let mut builder = RepoBuilder::new();
        builder.fetch_options(fetch_opts);
        builder
            .clone(repository, local_path)
            .map_err(|e| Error::CloneFailed { repository: repository.to_string(), source: e })
    }

    fn checkout(&self, handle: &Repository, branch: &str) -> Result<String> {
        self.switch_branch(handle, branch)
            .map_err(|e| Error::CheckoutFailed { branch: branch.to_string(), source: e })?;
        debug!("Checked out {branch}");
        Ok(branch.to_string())
    }

    fn commit(&self, handle: &Repository, path: &Path, message: &str) -> Result<bool> {
        self.stage_and_commit(handle, path, message)
            .map_err(|e| Error::CommitFailed { path: path.to_path_buf(), source: e })
    }

    fn push(&self, handle: &Repository, branch: &str) -> Result<()> {
        let failed = |reason: String| Error::PushFailed { branch: branch.to_string(), reason };

        let mut remote =
            handle.find_remote(&self.remote).map_err(|e| failed(e.message().to_string()))?;
        let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");
        let mut rejection: Option<String> = None;

        {
            let mut callbacks = self.callbacks();
            callbacks.push_update_reference(|refname, status| {
                if let Some(message) = status {
                    rejection = Some(format!("{refname} rejected: {message}"));
                }
                Ok(())
            });

            let mut options = PushOptions::new();
            options.remote_callbacks(callbacks);
            remote
                .push(&[refspec.as_str()], Some(&mut options))
                .map_err(|e| failed(e.message().to_string()))?;
        }

        match rejection {
            Some(reason) => Err(failed(reason)),
            None => {
                debug!("Pushed {branch} to {}", self.remote);
                Ok(())
            }
        }
    }
}
