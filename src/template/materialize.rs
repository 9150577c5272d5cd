use crate::config::OverwritePolicy;
use crate::context::SubstitutionContext;
use crate::error::{Error, Result};
use crate::renderer::TemplateRenderer;
use log::{debug, warn};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Result of rendering one template to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Materialized {
    pub template: PathBuf,
    pub output: PathBuf,
    /// False when the template could not be deleted and was left orphaned.
    pub template_removed: bool,
}

/// Renders `template_root/template_filename` into
/// `destination_root/output_filename`, then deletes the template.
///
/// The template is removed only after the output was written and synced; a
/// failed write leaves it untouched. A failed delete is logged and reported
/// through [`Materialized::template_removed`] instead of aborting.
///
/// Under [`OverwritePolicy::Strict`] an existing output file other than the
/// template itself is an `AlreadyExists` write failure.
pub fn materialize(
    renderer: &dyn TemplateRenderer,
    template_root: &Path,
    template_filename: &str,
    destination_root: &Path,
    output_filename: &str,
    context: &SubstitutionContext,
    policy: OverwritePolicy,
) -> Result<Materialized> {
    let template = template_root.join(template_filename);
    let output = destination_root.join(output_filename);
    debug!("Updating {} with template values", template.display());

    let create_new = policy == OverwritePolicy::Strict && template != output;
    if create_new && fs::symlink_metadata(&output).is_ok() {
        return Err(Error::RenderWriteFailed { path: output, source: already_exists() });
    }

    let rendered = renderer.render_file(template_root, template_filename, context)?;
    write_synced(&output, &rendered, create_new)
        .map_err(|e| Error::RenderWriteFailed { path: output.clone(), source: e })?;
    debug!("Template rendered to {}", output.display());

    let template_removed = if template == output {
        true
    } else {
        match fs::remove_file(&template) {
            Ok(()) => {
                debug!("Template file {} removed", template.display());
                true
            }
            Err(e) => {
                let err = Error::TemplateDeleteFailed { path: template.clone(), source: e };
                warn!("{err}");
                false
            }
        }
    };

    Ok(Materialized { template, output, template_removed })
}

fn already_exists() -> io::Error {
    io::Error::new(io::ErrorKind::AlreadyExists, "refusing to overwrite an existing file")
}

fn write_synced(path: &Path, content: &str, create_new: bool) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true);
    if create_new {
        options.create_new(true);
    } else {
        options.create(true).truncate(true);
    }
    let mut file = options.open(path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()
}
