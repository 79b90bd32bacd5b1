//! Prompt construction for command analysis.
//!
//! The prompt is a deterministic string: a fixed preamble, the command or
//! script under a labeled section, optional labeled sections for real
//! execution output and extra instructions, and a closing instruction naming
//! the expected answer sections.

const PREAMBLE: &str = "You are an assistant running on a local security-focused Linux machine.\n\
The user provided a command or shell script below. Provide an accurate, concise,\n\
and safety-focused analysis: what the command does, possible side effects,\n\
suggestions to improve/harden it, potential security concerns, and a simulated expected output.";

const CLOSING: &str =
    "Answer in clear sections: Summary, Potential Risks, Suggestions, Simulated Output.";

/// Build the analysis prompt. Pure string formatting, no failure modes.
pub fn build_prompt(
    text: &str,
    exec_output: Option<&str>,
    extra_instructions: Option<&str>,
) -> String {
    let mut prompt = format!("{}\n\n-- COMMAND/SCRIPT --\n{}", PREAMBLE, text.trim());

    if let Some(output) = exec_output {
        prompt.push_str("\n\n-- REAL EXECUTION OUTPUT --\n");
        prompt.push_str(output);
    }

    if let Some(extra) = extra_instructions {
        prompt.push_str("\n\n-- EXTRA INSTRUCTIONS --\n");
        prompt.push_str(extra);
    }

    prompt.push_str("\n\n");
    prompt.push_str(CLOSING);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_text_verbatim_and_closing() {
        let prompt = build_prompt("echo hello", None, None);
        assert!(prompt.contains("-- COMMAND/SCRIPT --\necho hello"));
        assert!(prompt.ends_with(
            "Answer in clear sections: Summary, Potential Risks, Suggestions, Simulated Output."
        ));
        assert!(!prompt.contains("-- REAL EXECUTION OUTPUT --"));
        assert!(!prompt.contains("-- EXTRA INSTRUCTIONS --"));
    }

    #[test]
    fn test_exec_output_sits_between_command_and_closing() {
        let prompt = build_prompt("ls -la", Some("file-a\nfile-b"), None);
        let cmd_at = prompt.find("-- COMMAND/SCRIPT --").unwrap();
        let out_at = prompt.find("-- REAL EXECUTION OUTPUT --").unwrap();
        let closing_at = prompt.find("Answer in clear sections").unwrap();
        assert!(cmd_at < out_at);
        assert!(out_at < closing_at);
        assert!(prompt.contains("file-a\nfile-b"));
    }

    #[test]
    fn test_extra_instructions_follow_exec_output() {
        let prompt = build_prompt("ls", Some("out"), Some("be brief"));
        let out_at = prompt.find("-- REAL EXECUTION OUTPUT --").unwrap();
        let extra_at = prompt.find("-- EXTRA INSTRUCTIONS --").unwrap();
        assert!(out_at < extra_at);
        assert!(prompt.contains("be brief"));
    }

    #[test]
    fn test_input_is_trimmed() {
        let prompt = build_prompt("  echo hi \n", None, None);
        assert!(prompt.contains("-- COMMAND/SCRIPT --\necho hi\n\nAnswer"));
    }
}
