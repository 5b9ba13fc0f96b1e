//! Ordered capability probing: try candidate providers until one yields the capability.

use std::fmt;

/// One candidate provider of a capability (a font file, a decoder backend, ...).
pub trait Probe {
    /// The capability produced on success.
    type Output;

    /// Short human-readable identity used in logs and aggregated failures.
    fn label(&self) -> String;

    /// Attempt to produce the capability.
    fn probe(&self) -> anyhow::Result<Self::Output>;
}

/// A failed probe and the reason it gave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeAttempt {
    /// Label of the candidate.
    pub label: String,
    /// Rendered error chain.
    pub reason: String,
}

/// Every candidate failed. Carries each attempt in probe order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeExhausted {
    /// Failed attempts, in the order they were tried.
    pub attempts: Vec<ProbeAttempt>,
}

impl fmt::Display for ProbeExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.attempts.is_empty() {
            return f.write_str("no candidates to probe");
        }
        for (i, a) in self.attempts.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", a.label, a.reason)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProbeExhausted {}

/// Probe `candidates` in order and return the first success together with its label.
pub fn first_available<P: Probe>(
    candidates: impl IntoIterator<Item = P>,
) -> Result<(P::Output, String), ProbeExhausted> {
    let mut exhausted = ProbeExhausted::default();
    for candidate in candidates {
        let label = candidate.label();
        match candidate.probe() {
            Ok(out) => return Ok((out, label)),
            Err(err) => {
                tracing::debug!(candidate = %label, error = %err, "probe candidate rejected");
                exhausted.attempts.push(ProbeAttempt {
                    label,
                    reason: format!("{err:#}"),
                });
            }
        }
    }
    Err(exhausted)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/probe.rs"]
mod tests;
