use anyhow::{Context as _, Result, anyhow, bail};
use richtext_core::{Command, KeyChord, Point, Selection, ToolbarButton};

pub const HELP: &str = "\
commands:
  show                     print the document as JSON
  render                   print the document as HTML
  status                   print which formats are active
  select <point> [<point>] set the selection; a point is `0.0:3` (path:offset)
  select-all               select the whole document
  deselect                 clear the selection
  key <chord>              press a key chord, e.g. `ctrl-b`, `ctrl-delete`
  click <button>           press a toolbar button: bold, code, left, center, right
  type <text>              insert text at the selection
  run <command-id>         run a command by id, e.g. `block.align_center`
  help                     show this help
  quit                     exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Empty,
    Show,
    Render,
    Status,
    Select(Selection),
    SelectAll,
    Deselect,
    Key(KeyChord),
    Click(ToolbarButton),
    Type(String),
    Run(Command),
    Help,
    Quit,
}

pub fn parse_line(line: &str) -> Result<Line> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (word, rest) = match line.trim_start().split_once(' ') {
        Some((word, rest)) => (word, rest),
        None => (line.trim(), ""),
    };

    Ok(match word {
        "" => Line::Empty,
        "show" => Line::Show,
        "render" => Line::Render,
        "status" => Line::Status,
        "select" => Line::Select(parse_selection(rest)?),
        "select-all" => Line::SelectAll,
        "deselect" => Line::Deselect,
        "key" => Line::Key(rest.trim().parse()?),
        "click" => Line::Click(rest.trim().parse()?),
        "type" => Line::Type(rest.to_string()),
        "run" => Line::Run(Command::from_id(rest.trim())?),
        "help" | "?" => Line::Help,
        "quit" | "exit" => Line::Quit,
        other => bail!("unknown command `{other}`, try `help`"),
    })
}

fn parse_selection(s: &str) -> Result<Selection> {
    let mut points = s.split_whitespace().map(parse_point);
    let anchor = points
        .next()
        .ok_or_else(|| anyhow!("select needs at least one point"))??;
    let focus = match points.next() {
        Some(point) => point?,
        None => anchor.clone(),
    };
    if points.next().is_some() {
        bail!("select takes at most two points");
    }
    Ok(Selection::new(anchor, focus))
}

fn parse_point(s: &str) -> Result<Point> {
    let (path, offset) = s
        .split_once(':')
        .ok_or_else(|| anyhow!("point `{s}` must look like `0.0:3`"))?;
    let path = path
        .split('.')
        .map(|ix| ix.parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("bad path in `{s}`"))?;
    let offset = offset
        .parse::<usize>()
        .with_context(|| format!("bad offset in `{s}`"))?;
    Ok(Point::new(path, offset))
}
