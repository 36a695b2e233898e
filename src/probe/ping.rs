//! Ping probe implementation driving the system `ping` binary.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use super::{ProbeError, ProbeReply, Prober};

/// Extra slack on top of the ping's own wait, so a stalled name resolution
/// cannot outlive the probe indefinitely.
const HARD_TIMEOUT_GRACE: Duration = Duration::from_secs(1);

/// Probes by running the system `ping` with a single echo request.
pub struct SystemPinger;

#[async_trait]
impl Prober for SystemPinger {
    async fn probe(&self, hostname: &str, timeout: Duration) -> Result<ProbeReply, ProbeError> {
        // Add jitter to avoid thundering herd across hosts
        let jitter = rand::random::<u64>() % 100;
        tokio::time::sleep(Duration::from_millis(jitter)).await;

        run_ping_command(hostname, timeout).await
    }
}

/// Run one echo request and capture combined stdout/stderr.
async fn run_ping_command(hostname: &str, timeout: Duration) -> Result<ProbeReply, ProbeError> {
    let wait_secs = timeout.as_secs().max(1);

    let child = Command::new("ping")
        .args(["-c", "1", "-W", &wait_secs.to_string(), hostname])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output();

    let output = match tokio::time::timeout(timeout + HARD_TIMEOUT_GRACE, child).await {
        Err(_) => return Err(ProbeError::Timeout(timeout)),
        Ok(result) => {
            result.map_err(|e| ProbeError::Launch(format!("failed to execute ping: {}", e)))?
        }
    };

    let mut raw_output = String::from_utf8_lossy(&output.stdout).into_owned();
    raw_output.push_str(&String::from_utf8_lossy(&output.stderr));

    classify_output(output.status.success(), raw_output, timeout)
}

/// Map the ping exit status and captured text onto the probe result.
fn classify_output(
    succeeded: bool,
    raw_output: String,
    timeout: Duration,
) -> Result<ProbeReply, ProbeError> {
    if succeeded {
        return Ok(ProbeReply { raw_output });
    }

    if raw_output.contains("timeout")
        || raw_output.contains("100% packet loss")
        || raw_output.contains("100.0% packet loss")
    {
        return Err(ProbeError::Timeout(timeout));
    }

    Err(ProbeError::Unreachable(raw_output))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(1);

    #[test]
    fn test_classify_success() {
        let raw = "64 bytes from 8.8.8.8: icmp_seq=1 ttl=117 time=12.3 ms".to_string();
        let reply = classify_output(true, raw, TIMEOUT).unwrap();
        assert!(reply.raw_output.contains("time=12.3"));
    }

    #[test]
    fn test_classify_packet_loss_is_timeout() {
        let raw = r#"PING 10.255.255.1 (10.255.255.1) 56(84) bytes of data.

--- 10.255.255.1 ping statistics ---
1 packets transmitted, 0 received, 100% packet loss, time 0ms"#
            .to_string();
        let err = classify_output(false, raw, TIMEOUT).unwrap_err();
        assert!(matches!(err, ProbeError::Timeout(_)));
        assert!(!err.is_launch_failure());
    }

    #[test]
    fn test_classify_other_failure_is_unreachable() {
        let raw = "ping: nosuchhost.invalid: Name or service not known".to_string();
        let err = classify_output(false, raw, TIMEOUT).unwrap_err();
        assert!(matches!(err, ProbeError::Unreachable(_)));
        assert!(!err.is_launch_failure());
    }
}
