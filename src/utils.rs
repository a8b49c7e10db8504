use indicatif::{ProgressBar, ProgressStyle};

/// Prompt for the service API token on stdin when none is configured.
pub fn prompt_token() -> std::io::Result<String> {
    use std::io::{self, Write};

    print!("IO App API token: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Progress bar fed by the engine's "N of M processed" signal.
pub fn progress_bar(len: u64, label: &str) -> ProgressBar {
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    bar.set_message(label.to_string());
    bar
}
