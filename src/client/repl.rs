//! Interactive prompt for the AQI assistant.

use crate::client::agent::AqiAgent;
use crate::client::tool_client::AgentError;
use std::io;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub const PROMPT: &str = "\n📍 Enter location to check AQI (or 'exit' to quit): ";
pub const GOODBYE: &str = "👋 Exiting AQI Assistant.";

#[derive(Debug, Error)]
enum StepError {
    #[error(transparent)]
    Agent(#[from] AgentError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

async fn say<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> io::Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await
}

/// Run weather, AQI and advisory for one location, printing each result
async fn check_location<W: AsyncWrite + Unpin>(
    agent: &AqiAgent,
    location: &str,
    output: &mut W,
) -> Result<(), StepError> {
    say(output, "\n🌫️ Fetching Weather & AQI data...").await?;

    let weather = agent.get_weather(location).await?;
    let weather_report = weather.text();
    say(output, &format!("\n📡 Weather Report:\n{weather_report}")).await?;

    let aqi = agent.get_aqi_report(location).await?;
    let aqi_report = aqi.text();
    say(output, &format!("\n📊 AQI Report for '{location}':\n{aqi_report}")).await?;

    if weather.is_error || aqi.is_error {
        say(
            output,
            "\n⚠️ Skipping health advice because a report could not be retrieved.",
        )
        .await?;
        return Ok(());
    }

    say(output, "\n💡 Getting health precautions...").await?;
    let advice = agent
        .get_health_recommendations(&weather_report, &aqi_report)
        .await?;
    say(output, &format!("\n✅ Health & Safety Advice:\n{}", advice.text())).await?;

    Ok(())
}

/// Prompt for locations until `exit` or end of input
///
/// A failed tool call is reported and the loop continues; only I/O errors
/// on the terminal end it early.
pub async fn run_repl<R, W>(agent: &AqiAgent, mut input: R, mut output: W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        line.clear();
        if input.read_line(&mut line).await? == 0 {
            say(&mut output, &format!("\n{GOODBYE}")).await?;
            return Ok(());
        }

        let location = line.trim();
        if location.eq_ignore_ascii_case("exit") {
            say(&mut output, GOODBYE).await?;
            return Ok(());
        }
        if location.is_empty() {
            continue;
        }

        match check_location(agent, location, &mut output).await {
            Ok(()) => {}
            Err(StepError::Agent(e)) => {
                tracing::warn!(location, error = %e, "Tool call failed");
                say(&mut output, &format!("❌ An error occurred: {e}")).await?;
            }
            Err(StepError::Io(e)) => return Err(e),
        }
    }
}
