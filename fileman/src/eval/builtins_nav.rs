use crate::error::{FmError, FmResult};
use crate::shell::Shell;
use super::utils::required_arg;
use super::ExecContext;
use tracing::debug;

impl Shell {
    pub(crate) fn cmd_up(&mut self, ctx: &mut ExecContext) -> FmResult<()> {
        if self.at_home() {
            ctx.notice("You are already in the home directory")?;
            return Ok(());
        }
        match self.cwd.parent() {
            Some(parent) => {
                self.cwd = parent.to_path_buf();
                debug!(cwd = %self.cwd.display(), "moved up");
            }
            None => ctx.notice("You are at the filesystem root")?,
        }
        Ok(())
    }

    pub(crate) async fn cmd_cd(&mut self, args: &[String]) -> FmResult<()> {
        let raw = required_arg(args, 0, "path")?;
        let target = self.resolve_path(raw);

        let metadata = tokio::fs::metadata(&target)
            .await
            .map_err(|e| FmError::from_io_kind(&target, e))?;
        if !metadata.is_dir() {
            return Err(FmError::NotADirectory(target.display().to_string()));
        }

        debug!(from = %self.cwd.display(), to = %target.display(), "cd");
        self.cwd = target;
        Ok(())
    }
}
