//! Stdio transport: JSON-RPC lines in on stdin, replies out on stdout.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::protocol::ProtocolHandler;
use crate::types::{JsonRpcReply, McpError, McpResult};

use super::framing;

/// Stdio transport for the MCP server.
pub struct StdioTransport {
    handler: ProtocolHandler,
}

impl StdioTransport {
    pub fn new(handler: ProtocolHandler) -> Self {
        Self { handler }
    }

    /// Serve the process's stdin/stdout until EOF.
    pub async fn run(&self) -> McpResult<()> {
        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();
        self.serve(reader, writer).await
    }

    /// Serve any line-oriented stream pair. Returns `Ok` on clean EOF and
    /// `Err` on I/O failure or input that is not valid UTF-8. Messages are
    /// handled strictly in arrival order.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> McpResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();
        tracing::info!("Stdio transport started");

        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await.map_err(McpError::Io)?;
            if bytes_read == 0 {
                tracing::info!("EOF on input, shutting down");
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Err(e) = self.handle_line(trimmed, &mut writer).await {
                if e.is_fatal() {
                    tracing::error!("Transport failed: {e}");
                    return Err(e);
                }
                tracing::warn!("Dropped reply: {e}");
            }
        }

        writer.flush().await.map_err(McpError::Io)?;
        Ok(())
    }

    async fn handle_line<W>(&self, line: &str, writer: &mut W) -> McpResult<()>
    where
        W: AsyncWrite + Unpin,
    {
        let reply = match framing::parse_message(line) {
            Ok(msg) => self.handler.handle_message(msg).await,
            Err(e) => {
                tracing::warn!("Rejected input line: {e}");
                Some(JsonRpcReply::Error(e.to_json_rpc_error(framing::recover_id(line))))
            }
        };

        let Some(reply) = reply else {
            return Ok(());
        };
        tracing::debug!(id = %reply.id(), error = reply.is_error(), "Writing reply");
        let framed = framing::frame_message(&reply)?;
        writer.write_all(framed.as_bytes()).await.map_err(McpError::Io)?;
        writer.flush().await.map_err(McpError::Io)
    }
}
