use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use io::Read;
use log::{debug, info};
use std::fmt::Write;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::CommandError;
use crate::naming;
use crate::store::{SelectionSets, DEFAULT_SET_NAME};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Uniquify {
        name: String,
        existing: Vec<String>,
        stdin: bool,
    },
    Add {
        name: String,
        bones: Vec<String>,
    },
    Remove {
        name: String,
    },
    Rename {
        index: usize,
        new_name: String,
    },
    List,
}

#[derive(Debug)]
pub struct CommandOptions {
    action: Action,
    store: Option<PathBuf>,
    default_name: String,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            action: Action::List,
            store: None,
            default_name: DEFAULT_SET_NAME.to_string(),
        }
    }
}

impl CommandOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn store(&self) -> Option<&Path> {
        self.store.as_deref()
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }
}

#[derive(Debug, Default)]
pub struct Command {}

impl Command {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(&self, args: impl IntoIterator<Item = String>) -> Result<String, CommandError> {
        self.run_with_input(args, &mut io::stdin())
    }

    /// Like `run()`, but `uniquify --stdin` reads names from `input`.
    pub fn run_with_input(
        &self,
        args: impl IntoIterator<Item = String>,
        input: &mut dyn Read,
    ) -> Result<String, CommandError> {
        let options = parse_options(args)?;
        debug!("[command] {:?}", options);

        match options.action {
            Action::Uniquify {
                name,
                mut existing,
                stdin,
            } => {
                if stdin {
                    let mut content = String::new();
                    input.read_to_string(&mut content)?;
                    existing.extend(content.lines().map(str::to_string));
                }
                Ok(format!("{}\n", naming::uniquify(&name, &existing)))
            }
            Action::Add { name, bones } => {
                let path = store_path(&options.store)?;
                let mut sets = load_store(path)?.with_default_name(options.default_name);
                let created = sets.create(&name, &bones).name().to_string();

                save_store(path, &sets)?;
                Ok(format!("{}\n", created))
            }
            Action::Remove { name } => {
                let path = store_path(&options.store)?;
                let mut sets = load_store(path)?;
                let removed = sets.delete(&name)?;

                save_store(path, &sets)?;
                Ok(format!("{}\n", removed.name()))
            }
            Action::Rename { index, new_name } => {
                let path = store_path(&options.store)?;
                let mut sets = load_store(path)?;
                let renamed = sets.rename(index, &new_name)?.to_string();

                save_store(path, &sets)?;
                Ok(format!("{}\n", renamed))
            }
            Action::List => {
                let path = store_path(&options.store)?;
                let sets = load_store(path)?;

                Ok(format_list(&sets))
            }
        }
    }
}

pub fn parse_options(
    args: impl IntoIterator<Item = String>,
) -> Result<CommandOptions, CommandError> {
    let mut options = CommandOptions::new();

    let store = || {
        Arg::with_name("store")
            .long("store")
            .value_name("FILE")
            .help("Selection sets file (JSON)")
            .takes_value(true)
            .required(true)
    };

    let matches = App::new("selset")
        .about("Names and manages selection sets of armature bones")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("uniquify")
                .about("Prints a name which doesn't collide with the existing names")
                .arg(Arg::with_name("NAME").required(true).index(1))
                .arg(Arg::with_name("EXISTING").multiple(true).index(2))
                .arg(
                    Arg::with_name("stdin")
                        .long("stdin")
                        .help("Reads existing names from stdin, one per line"),
                ),
        )
        .subcommand(
            SubCommand::with_name("add")
                .about("Creates a selection set")
                .arg(store())
                .arg(Arg::with_name("name").long("name").takes_value(true))
                .arg(
                    Arg::with_name("default-name")
                        .long("default-name")
                        .takes_value(true)
                        .help("Name to use when --name is not given"),
                )
                .arg(Arg::with_name("BONE").multiple(true).index(1)),
        )
        .subcommand(
            SubCommand::with_name("remove")
                .about("Removes the named selection set, or the active one")
                .arg(store())
                .arg(Arg::with_name("name").long("name").takes_value(true)),
        )
        .subcommand(
            SubCommand::with_name("rename")
                .about("Renames the selection set at INDEX")
                .arg(store())
                .arg(Arg::with_name("INDEX").required(true).index(1))
                .arg(Arg::with_name("NEW_NAME").required(true).index(2)),
        )
        .subcommand(
            SubCommand::with_name("list")
                .about("Lists selection sets")
                .arg(store()),
        )
        .get_matches_from_safe(args)?;

    let (name, sub) = matches.subcommand();
    let sub = match sub {
        Some(sub) => sub,
        None => return Err("Missing subcommand".to_string().into()),
    };

    if let Some(path) = sub.value_of("store") {
        options.store = Some(PathBuf::from(path));
    }
    if let Some(default_name) = sub.value_of("default-name") {
        options.default_name = default_name.to_string();
    }

    options.action = match name {
        "uniquify" => Action::Uniquify {
            name: value(sub, "NAME"),
            existing: values(sub, "EXISTING"),
            stdin: sub.is_present("stdin"),
        },
        "add" => Action::Add {
            name: value(sub, "name"),
            bones: values(sub, "BONE"),
        },
        "remove" => Action::Remove {
            name: value(sub, "name"),
        },
        "rename" => {
            let index = value(sub, "INDEX");
            Action::Rename {
                index: index
                    .parse()
                    .map_err(|e| format!("Invalid index `{}`: {}", index, e))?,
                new_name: value(sub, "NEW_NAME"),
            }
        }
        "list" => Action::List,
        _ => return Err(format!("Unknown subcommand: `{}`", name).into()),
    };

    Ok(options)
}

fn value(matches: &ArgMatches<'_>, name: &str) -> String {
    matches.value_of(name).unwrap_or_default().to_string()
}

fn values(matches: &ArgMatches<'_>, name: &str) -> Vec<String> {
    matches
        .values_of(name)
        .map(|values| values.map(str::to_string).collect())
        .unwrap_or_default()
}

fn store_path(store: &Option<PathBuf>) -> Result<&Path, CommandError> {
    store
        .as_deref()
        .ok_or_else(|| "--store is required".to_string().into())
}

fn load_store(path: &Path) -> Result<SelectionSets, CommandError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            info!("[command] {} does not exist, starting empty", path.display());
            Ok(SelectionSets::new())
        }
        Err(err) => Err(err.into()),
    }
}

fn save_store(path: &Path, sets: &SelectionSets) -> Result<(), CommandError> {
    let mut json = serde_json::to_string_pretty(sets)?;
    json.push('\n');

    fs::write(path, json)?;
    Ok(())
}

fn format_list(sets: &SelectionSets) -> String {
    let mut out = String::new();

    for (i, set) in sets.iter().enumerate() {
        let marker = if i == sets.active_index() { '*' } else { ' ' };
        let _ = writeln!(out, "{}{}: {}", marker, set.name(), set.bone_ids().join(", "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    fn run(line: &str) -> Result<String, CommandError> {
        Command::new().run_with_input(args(line), &mut io::empty())
    }

    fn store_in(dir: &TempDir) -> String {
        dir.path().join("sets.json").display().to_string()
    }

    #[test]
    fn parse_uniquify() {
        let options = parse_options(args("selset uniquify hey hey hey.001")).unwrap();

        assert_eq!(
            options.action(),
            &Action::Uniquify {
                name: "hey".to_string(),
                existing: vec!["hey".to_string(), "hey.001".to_string()],
                stdin: false,
            }
        );
        assert!(options.store().is_none());
        assert_eq!(options.default_name(), DEFAULT_SET_NAME);
    }

    #[test]
    fn parse_add() {
        let options =
            parse_options(args("selset add --store s.json --default-name Set a b")).unwrap();

        assert_eq!(
            options.action(),
            &Action::Add {
                name: "".to_string(),
                bones: vec!["a".to_string(), "b".to_string()],
            }
        );
        assert_eq!(options.store(), Some(Path::new("s.json")));
        assert_eq!(options.default_name(), "Set");
    }

    #[test]
    fn parse_errors() {
        assert_matches!(parse_options(args("selset")), Err(CommandError::Arguments(_)));
        assert_matches!(
            parse_options(args("selset list")),
            Err(CommandError::Arguments(_))
        );
        assert_matches!(
            parse_options(args("selset rename --store s.json x y")),
            Err(CommandError::InvalidOption(message)) => {
                assert!(message.starts_with("Invalid index `x`"));
            }
        );
    }

    #[test]
    fn uniquify() {
        assert_eq!(run("selset uniquify hey there").unwrap(), "hey\n");
        assert_eq!(
            run("selset uniquify hey hey hey.005 hey.001 hey.left").unwrap(),
            "hey.002\n"
        );
    }

    #[test]
    fn uniquify_from_stdin() {
        let mut input: &[u8] = b"hey\nhey.001\nhey.002\n";
        let output = Command::new()
            .run_with_input(args("selset uniquify --stdin hey"), &mut input)
            .unwrap();

        assert_eq!(output, "hey.003\n");
    }

    #[test]
    fn add_remove_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let add = format!("selset add --store {} thigh.L shin.L thigh.L", store);
        assert_eq!(run(&add).unwrap(), "NewSelectionSet\n");
        assert_eq!(run(&add).unwrap(), "NewSelectionSet.001\n");

        let add = format!("selset add --store {} --name arms hand.L", store);
        assert_eq!(run(&add).unwrap(), "arms\n");

        let list = format!("selset list --store {}", store);
        assert_eq!(
            run(&list).unwrap(),
            "*NewSelectionSet: thigh.L, shin.L\n NewSelectionSet.001: thigh.L, shin.L\n arms: hand.L\n"
        );

        let remove = format!("selset remove --store {} --name NewSelectionSet.001", store);
        assert_eq!(run(&remove).unwrap(), "NewSelectionSet.001\n");

        // removes the active set
        let remove = format!("selset remove --store {}", store);
        assert_eq!(run(&remove).unwrap(), "NewSelectionSet\n");
        assert_eq!(run(&list).unwrap(), "*arms: hand.L\n");

        assert_eq!(run(&remove).unwrap(), "arms\n");
        assert_eq!(run(&list).unwrap(), "");
        assert_matches!(
            run(&remove),
            Err(CommandError::Store(StoreError::Empty))
        );
    }

    #[test]
    fn rename() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        run(&format!("selset add --store {} --name a x", store)).unwrap();
        run(&format!("selset add --store {} --name b x", store)).unwrap();

        let rename = format!("selset rename --store {} 1 a", store);
        assert_eq!(run(&rename).unwrap(), "a.001\n");

        let rename = format!("selset rename --store {} 7 a", store);
        assert_matches!(
            run(&rename),
            Err(CommandError::Store(StoreError::IndexOutOfRange { index: 7, len: 2 }))
        );
    }

    #[test]
    fn malformed_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        fs::write(&store, r#"{"sets": [{"name": "a"}, {"name": "a"}]}"#).unwrap();
        assert_matches!(
            run(&format!("selset list --store {}", store)),
            Err(CommandError::Json(_))
        );

        fs::write(&store, "not json").unwrap();
        assert_matches!(
            run(&format!("selset list --store {}", store)),
            Err(CommandError::Json(_))
        );
    }
}
