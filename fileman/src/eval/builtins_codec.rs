use crate::error::{FmError, FmResult};
use crate::shell::Shell;
use super::utils::required_arg;
use super::{ExecContext, STREAM_CHUNK_SIZE};
use async_compression::tokio::bufread::{BrotliDecoder, BrotliEncoder};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

/// SHA-256 of a file as lowercase hex, read in fixed-size chunks.
pub async fn sha256_file(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; STREAM_CHUNK_SIZE];
    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Compress,
    Decompress,
}

impl Direction {
    fn verb(self) -> &'static str {
        match self {
            Direction::Compress => "compressed",
            Direction::Decompress => "decompressed",
        }
    }
}

impl Shell {
    pub(crate) async fn cmd_hash(&mut self, args: &[String], ctx: &mut ExecContext) -> FmResult<()> {
        let path = self.resolve_path(required_arg(args, 0, "path")?);
        let digest = sha256_file(&path)
            .await
            .map_err(|e| FmError::io(format!("hash {}", path.display()), e))?;
        ctx.stdout.writeln(&digest)?;
        Ok(())
    }

    pub(crate) async fn cmd_compress(&mut self, args: &[String], ctx: &mut ExecContext) -> FmResult<()> {
        self.transcode(args, ctx, Direction::Compress).await
    }

    pub(crate) async fn cmd_decompress(&mut self, args: &[String], ctx: &mut ExecContext) -> FmResult<()> {
        self.transcode(args, ctx, Direction::Decompress).await
    }

    async fn transcode(
        &mut self,
        args: &[String],
        ctx: &mut ExecContext,
        direction: Direction,
    ) -> FmResult<()> {
        let (source, destination) = self.source_and_target(args)?;
        let context = || format!("{} -> {}", source.display(), destination.display());

        let reader = BufReader::new(
            File::open(&source)
                .await
                .map_err(|e| FmError::io(context(), e))?,
        );
        let mut writer = File::create(&destination)
            .await
            .map_err(|e| FmError::io(context(), e))?;

        let bytes = match direction {
            Direction::Compress => pipe(BrotliEncoder::new(reader), &mut writer).await,
            Direction::Decompress => pipe(BrotliDecoder::new(reader), &mut writer).await,
        }
        .map_err(|e| FmError::io(context(), e))?;

        debug!(?direction, bytes, from = %source.display(), to = %destination.display(), "transcoded");
        ctx.notice(&format!(
            "File {} {} to {}",
            source.display(),
            direction.verb(),
            destination.display()
        ))?;
        Ok(())
    }

    fn source_and_target(&self, args: &[String]) -> FmResult<(PathBuf, PathBuf)> {
        let source = self.resolve_path(required_arg(args, 0, "source path")?);
        let destination = self.resolve_path(required_arg(args, 1, "destination path")?);
        if source == destination {
            return Err(FmError::InvalidArgument(format!(
                "source and destination are identical paths: {}",
                source.display()
            )));
        }
        Ok((source, destination))
    }
}

async fn pipe<R: AsyncRead + Unpin>(mut reader: R, writer: &mut File) -> std::io::Result<u64> {
    let bytes = tokio::io::copy(&mut reader, writer).await?;
    writer.flush().await?;
    Ok(bytes)
}
