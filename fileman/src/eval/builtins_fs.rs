use crate::error::{FmError, FmResult};
use crate::path::normalize;
use crate::shell::Shell;
use super::utils::{render_table, required_arg, Utf8Stream};
use super::{ExecContext, STREAM_CHUNK_SIZE};
use std::cmp::Ordering;
use std::fmt;
use std::path::Path;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Folder,
    File,
    /// Symlinks, sockets, devices. Links are not followed.
    Other,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntryKind::Folder => "folder",
            EntryKind::File => "file",
            EntryKind::Other => "other",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String,
    pub kind: EntryKind,
}

/// Folders first, then by name ignoring case, then by exact name.
fn listing_order(a: &DirEntryInfo, b: &DirEntryInfo) -> Ordering {
    let a_folder = a.kind == EntryKind::Folder;
    let b_folder = b.kind == EntryKind::Folder;
    b_folder
        .cmp(&a_folder)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

/// Read and classify a directory in listing order.
pub async fn list_dir(path: &Path) -> FmResult<Vec<DirEntryInfo>> {
    let context = || format!("ls {}", path.display());
    let mut reader = fs::read_dir(path).await.map_err(|e| FmError::io(context(), e))?;

    let mut entries = Vec::new();
    while let Some(entry) = reader.next_entry().await.map_err(|e| FmError::io(context(), e))? {
        let file_type = entry.file_type().await.map_err(|e| FmError::io(context(), e))?;
        let kind = if file_type.is_dir() {
            EntryKind::Folder
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };
        entries.push(DirEntryInfo {
            name: entry.file_name().to_string_lossy().into_owned(),
            kind,
        });
    }

    entries.sort_by(listing_order);
    Ok(entries)
}

impl Shell {
    pub(crate) async fn cmd_ls(&mut self, ctx: &mut ExecContext) -> FmResult<()> {
        let entries = list_dir(&self.cwd).await?;
        if entries.is_empty() {
            ctx.notice("Directory is empty")?;
            return Ok(());
        }

        let rows: Vec<Vec<String>> = entries
            .iter()
            .map(|e| vec![e.name.clone(), e.kind.to_string()])
            .collect();
        ctx.stdout.write(render_table(&["Name", "Type"], &rows).as_bytes())?;
        Ok(())
    }

    pub(crate) async fn cmd_cat(&mut self, args: &[String], ctx: &mut ExecContext) -> FmResult<()> {
        let path = self.resolve_path(required_arg(args, 0, "path")?);
        let context = || format!("cat {}", path.display());

        let mut file = File::open(&path).await.map_err(|e| FmError::io(context(), e))?;
        let mut buf = vec![0u8; STREAM_CHUNK_SIZE];
        let mut text = Utf8Stream::default();

        loop {
            let n = file.read(&mut buf).await.map_err(|e| FmError::io(context(), e))?;
            if n == 0 {
                break;
            }
            ctx.stdout.write(text.decode(&buf[..n]).as_bytes())?;
        }
        ctx.stdout.write(text.finish().as_bytes())?;
        ctx.stdout.write(b"\n")?;
        Ok(())
    }

    pub(crate) async fn cmd_add(&mut self, args: &[String], ctx: &mut ExecContext) -> FmResult<()> {
        let path = self.resolve_path(required_arg(args, 0, "file name")?);

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| FmError::from_io_kind(&path, e))?;
        file.flush().await.map_err(|e| FmError::io(path.display().to_string(), e))?;

        ctx.notice(&format!("File {} created", path.display()))?;
        Ok(())
    }

    pub(crate) async fn cmd_rn(&mut self, args: &[String], ctx: &mut ExecContext) -> FmResult<()> {
        let source = self.resolve_path(required_arg(args, 0, "path")?);
        let new_name = required_arg(args, 1, "new name")?;

        // The new name lives next to the source, even if it looks absolute.
        let parent = source.parent().unwrap_or(source.as_path());
        let target = normalize(&parent.join(new_name.trim_start_matches('/')));

        let taken = fs::try_exists(&target)
            .await
            .map_err(|e| FmError::from_io_kind(&target, e))?;
        if taken {
            return Err(FmError::AlreadyExists(target.display().to_string()));
        }
        fs::rename(&source, &target)
            .await
            .map_err(|e| FmError::from_io_kind(&source, e))?;

        ctx.notice(&format!("{} renamed to {}", source.display(), target.display()))?;
        Ok(())
    }

    /// `cp` and `mv`: stream a single file into a destination directory,
    /// deleting the source afterwards when `remove_source` is set.
    pub(crate) async fn cmd_copy(
        &mut self,
        args: &[String],
        ctx: &mut ExecContext,
        remove_source: bool,
    ) -> FmResult<()> {
        let source = self.resolve_path(required_arg(args, 0, "source path")?);
        let dest_dir = self.resolve_path(required_arg(args, 1, "destination directory")?);

        let metadata = fs::metadata(&source)
            .await
            .map_err(|e| FmError::from_io_kind(&source, e))?;
        if metadata.is_dir() {
            return Err(FmError::Unsupported(format!(
                "{} is a directory; only single files can be copied",
                source.display()
            )));
        }

        let file_name = source.file_name().ok_or_else(|| {
            FmError::InvalidArgument(format!("{} has no file name", source.display()))
        })?;
        let destination = dest_dir.join(file_name);
        if source == destination {
            return Err(FmError::InvalidArgument(format!(
                "source and destination are identical paths: {}",
                source.display()
            )));
        }

        copy_stream(&source, &destination).await?;

        if remove_source {
            fs::remove_file(&source)
                .await
                .map_err(|e| FmError::io(format!("remove {}", source.display()), e))?;
            ctx.notice(&format!("{} moved to {}", source.display(), destination.display()))?;
        } else {
            ctx.notice(&format!("{} copied to {}", source.display(), destination.display()))?;
        }
        Ok(())
    }

    pub(crate) async fn cmd_rm(&mut self, args: &[String], ctx: &mut ExecContext) -> FmResult<()> {
        let path = self.resolve_path(required_arg(args, 0, "path")?);
        let context = || format!("rm {}", path.display());

        let metadata = fs::symlink_metadata(&path)
            .await
            .map_err(|e| FmError::io(context(), e))?;
        let removed = if metadata.is_dir() {
            fs::remove_dir(&path).await
        } else {
            fs::remove_file(&path).await
        };
        removed.map_err(|e| FmError::io(context(), e))?;

        ctx.notice(&format!("{} deleted", path.display()))?;
        Ok(())
    }
}

/// Copy `source` to a new file at `destination`. A destination that
/// already exists is left alone; a partially written one is removed.
async fn copy_stream(source: &Path, destination: &Path) -> FmResult<()> {
    let mut reader = File::open(source)
        .await
        .map_err(|e| FmError::from_io_kind(source, e))?;
    let mut writer = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(destination)
        .await
        .map_err(|e| FmError::from_io_kind(destination, e))?;

    let copied = async {
        let bytes = tokio::io::copy(&mut reader, &mut writer).await?;
        writer.flush().await?;
        Ok::<u64, std::io::Error>(bytes)
    }
    .await;

    match copied {
        Ok(bytes) => {
            debug!(from = %source.display(), to = %destination.display(), bytes, "copied");
            Ok(())
        }
        Err(e) => {
            drop(writer);
            if let Err(cleanup) = fs::remove_file(destination).await {
                warn!(path = %destination.display(), error = %cleanup, "failed to remove partial copy");
            }
            Err(FmError::io(
                format!("copy {} to {}", source.display(), destination.display()),
                e,
            ))
        }
    }
}
