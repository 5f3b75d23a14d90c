use crate::args::Cli;
use crate::config::Config;
use crate::logging;
use crate::presentation::{Gutter, Painter};
use crate::source::{Source, read_sources};
use crate::types::{ColorChoice, ViewMode};
use anyhow::Result;
use logweave_engine::{DisplayTree, TreeAssembler, is_causal_record};
use logweave_formats::{Classifier, ClassifierConfig};
use std::io::{self, BufWriter, Write};
use tracing::debug;

/// Effective display settings after merging config file and flags.
#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub view: ViewMode,
    pub expand_all: bool,
    pub timestamps: bool,
    pub line_numbers: bool,
    pub color: ColorChoice,
    pub classifier: ClassifierConfig,
}

impl ViewOptions {
    /// Flags only ever switch features on; `--color` replaces the file value.
    pub fn resolve(cli: &Cli, config: Config) -> Self {
        Self {
            view: cli.view,
            expand_all: cli.expand_all || config.tree.expand_all,
            timestamps: cli.timestamps || config.display.timestamps,
            line_numbers: cli.line_numbers || config.display.line_numbers,
            color: cli.color.unwrap_or(config.display.color),
            classifier: config.classifier,
        }
    }
}

/// Pick flat or tree view for a source. `auto` looks at the first
/// non-blank line only.
pub fn resolve_view(mode: ViewMode, source: &Source) -> ViewMode {
    match mode {
        ViewMode::Auto => match source.first_content_line() {
            Some(line) if is_causal_record(line) => ViewMode::Tree,
            _ => ViewMode::Flat,
        },
        forced => forced,
    }
}

pub fn render_flat(source: &Source, options: &ViewOptions, painter: &Painter) -> Vec<String> {
    let mut classifier = Classifier::with_config(&options.classifier);
    let gutter = Gutter::new(options.line_numbers, options.timestamps, source.lines.len());
    let lines = source
        .lines
        .iter()
        .enumerate()
        .map(|(index, line)| painter.flat_line(index + 1, &classifier.classify(line), gutter))
        .collect();
    debug!(source = %source.name, order = ?classifier.order(), "final matcher order");
    lines
}

pub fn build_tree(source: &Source, expand_all: bool) -> DisplayTree {
    let mut tree = DisplayTree::new(source.name.as_str());
    let mut assembler = TreeAssembler::new();
    for line in &source.lines {
        assembler.add_line(&mut tree, line);
    }

    debug!(
        source = %source.name,
        tasks = assembler.task_count(),
        pending = assembler.pending_tasks(),
        "causal tree assembled"
    );

    if expand_all {
        tree.expand_all();
    }
    tree
}

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level);

    let config = Config::load(cli.config.as_deref())?;
    let options = ViewOptions::resolve(&cli, config);
    let painter = Painter::from_choice(options.color);
    let sources = read_sources(&cli.files)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let with_headers = sources.len() > 1;

    for (index, source) in sources.iter().enumerate() {
        if with_headers {
            if index > 0 {
                writeln!(out)?;
            }
            writeln!(out, "{}", painter.header(&source.name))?;
        }

        let lines = match resolve_view(options.view, source) {
            ViewMode::Tree => painter.tree_lines(&build_tree(source, options.expand_all)),
            _ => render_flat(source, &options, &painter),
        };
        for line in lines {
            writeln!(out, "{}", line)?;
        }
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn source(text: &str) -> Source {
        Source::from_bytes("test.log", text.as_bytes())
    }

    #[test]
    fn test_auto_view_uses_first_content_line() {
        let causal = source(
            "\n{\"task_uuid\": \"u1\", \"task_level\": [1], \"action_type\": \"a\", \"action_status\": \"started\"}\nplain\n",
        );
        assert_eq!(resolve_view(ViewMode::Auto, &causal), ViewMode::Tree);

        let plain = source("plain\n{\"task_uuid\": \"u1\", \"task_level\": [1], \"action_type\": \"a\"}\n");
        assert_eq!(resolve_view(ViewMode::Auto, &plain), ViewMode::Flat);
        assert_eq!(resolve_view(ViewMode::Tree, &plain), ViewMode::Tree);
        assert_eq!(resolve_view(ViewMode::Auto, &source("")), ViewMode::Flat);
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        config.display.color = ColorChoice::Always;
        config.tree.expand_all = true;

        let cli = Cli::parse_from(["logweave", "--color", "never", "--timestamps"]);
        let options = ViewOptions::resolve(&cli, config);

        assert_eq!(options.color, ColorChoice::Never);
        assert!(options.expand_all);
        assert!(options.timestamps);
        assert_eq!(options.view, ViewMode::Auto);
    }

    #[test]
    fn test_render_flat_plain_text() {
        let cli = Cli::parse_from(["logweave"]);
        let options = ViewOptions::resolve(&cli, Config::default());
        let lines = render_flat(
            &source("not a log line at all\n"),
            &options,
            &Painter::new(false),
        );
        assert_eq!(lines, vec!["not a log line at all"]);
    }

    #[test]
    fn test_render_flat_line_numbers() {
        let mut config = Config::default();
        config.display.line_numbers = true;
        let cli = Cli::parse_from(["logweave"]);
        let options = ViewOptions::resolve(&cli, config);
        assert!(options.line_numbers);

        let text: String = (1..=10).map(|n| format!("line {}\n", n)).collect();
        let lines = render_flat(&source(&text), &options, &Painter::new(false));
        assert_eq!(lines[0], " 1 line 1");
        assert_eq!(lines[9], "10 line 10");
    }
}
