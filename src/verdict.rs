//! Pure text-to-verdict classifier for the line-oriented status protocol
//! emitted by `am instrument -w`. Does no process control; the same input
//! always yields the same verdict.

use crate::models::{Diagnostic, Verdict};

const STATUS_PREFIX: &str = "INSTRUMENTATION_STATUS: ";
const STATUS_CODE_PREFIX: &str = "INSTRUMENTATION_STATUS_CODE: ";

/// Status codes reported by the instrumentation runner.
const CODE_ASSERTION_FAILURE: &str = "-2";
const CODE_ERROR: &str = "-1";

/// Stack heads that mark an assertion-style failure rather than a generic
/// uncaught condition.
const ASSERTION_MARKERS: &[&str] = &[
    "junit.framework.AssertionFailedError",
    "junit.framework.ComparisonFailure",
    "java.lang.AssertionError",
];

/// Classify the combined captured output of one test invocation.
///
/// A `stack=` field whose head names an assertion type (or a `-2` status
/// code) is a failure; any other stack is an error. No protocol output at
/// all is an error — a test never passes on missing evidence.
pub fn parse(text: &str) -> Verdict {
    let mut saw_protocol = false;
    let mut stack: Option<String> = None;
    let mut assertion_code = false;
    let mut error_code = false;
    // True while scanning the continuation lines of a stack= value, which
    // runs until the next INSTRUMENTATION_ line.
    let mut in_stack = false;

    for line in text.lines() {
        if let Some(rest) = line.strip_prefix(STATUS_PREFIX) {
            saw_protocol = true;
            if let Some(head) = rest.strip_prefix("stack=") {
                stack = Some(head.to_string());
                in_stack = true;
            } else {
                in_stack = false;
            }
        } else if let Some(code) = line.strip_prefix(STATUS_CODE_PREFIX) {
            saw_protocol = true;
            in_stack = false;
            match code.trim() {
                CODE_ASSERTION_FAILURE => assertion_code = true,
                CODE_ERROR => error_code = true,
                _ => {}
            }
        } else if line.starts_with("INSTRUMENTATION_") {
            saw_protocol = true;
            in_stack = false;
        } else if in_stack
            && let Some(stack) = stack.as_mut()
        {
            stack.push('\n');
            stack.push_str(line);
        }
    }

    if !saw_protocol {
        return Verdict::Errored(Diagnostic {
            message: "no instrumentation output received".to_string(),
            trace: text.trim().to_string(),
        });
    }

    match stack {
        Some(trace) => {
            let head = trace.lines().next().unwrap_or("");
            let assertion =
                assertion_code || ASSERTION_MARKERS.iter().any(|m| head.starts_with(m));
            let diagnostic = Diagnostic {
                message: head_message(head),
                trace: trace.clone(),
            };
            if assertion {
                Verdict::Failed(diagnostic)
            } else {
                Verdict::Errored(diagnostic)
            }
        }
        None if assertion_code => Verdict::Failed(Diagnostic {
            message: "assertion failure reported without a stack trace".to_string(),
            trace: text.trim().to_string(),
        }),
        None if error_code => Verdict::Errored(Diagnostic {
            message: "error reported without a stack trace".to_string(),
            trace: text.trim().to_string(),
        }),
        None => Verdict::Passed,
    }
}

/// Message part of a stack head line: the remainder after the exception
/// class name, or the whole line when there is no `: ` separator.
fn head_message(head: &str) -> String {
    match head.split_once(": ") {
        Some((_, message)) => message.to_string(),
        None => head.to_string(),
    }
}
