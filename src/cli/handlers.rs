use std::error::Error;
use std::path::PathBuf;

use crate::cli::commands::*;
use crate::cli::output;
use crate::io::blob::{self, PersistenceError};
use crate::io::lock::StoreLock;
use crate::io::settings_io;
use crate::io::vault::Base64Armor;
use crate::model::document::DocKind;
use crate::model::store::Store;
use crate::ops::project_ops::{self, ProjectFields};
use crate::ops::{document_ops, folder_ops};
use crate::ops::search::SearchState;
use crate::ops::export;

/// A loaded working context: where the data lives and the store in memory
struct Context {
    data_dir: PathBuf,
    store: Store,
    cipher: Base64Armor,
}

impl Context {
    fn load(data_dir_override: Option<&str>) -> Result<Self, Box<dyn Error>> {
        let start = match data_dir_override {
            Some(dir) => std::fs::canonicalize(dir)
                .map_err(|e| format!("cannot resolve -C path '{dir}': {e}"))?,
            None => std::env::current_dir()?,
        };
        let data_dir = blob::discover_data_dir(&start)?;
        let cipher = Base64Armor;
        let mut store = blob::load_store(&data_dir, &cipher)?;
        // settings.toml is authoritative for settings; the blob carries a
        // mirror so backups stay self-contained
        store.settings = settings_io::read_settings(&data_dir)?;
        Ok(Context {
            data_dir,
            store,
            cipher,
        })
    }

    fn save(&self) -> Result<(), PersistenceError> {
        let _lock = StoreLock::acquire_default(&self.data_dir).map_err(|e| {
            PersistenceError::Write {
                path: self.data_dir.clone(),
                source: std::io::Error::other(e.to_string()),
            }
        })?;
        blob::save_store(&self.data_dir, &self.store, &self.cipher)
    }
}

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn Error>> {
    let json = cli.json;
    let data_dir = cli.data_dir.as_deref();

    match cli.command {
        None => {
            eprintln!("usage: fo <command> (try `fo --help`)");
            Ok(())
        }
        Some(Commands::Init(args)) => cmd_init(args, data_dir),
        Some(Commands::Projects) => cmd_projects(json, data_dir),
        Some(Commands::New(args)) => cmd_new(args, data_dir),
        Some(Commands::Add(args)) => cmd_add(args, data_dir),
        Some(Commands::Mkdir(args)) => cmd_mkdir(args, data_dir),
        Some(Commands::Tree(args)) => cmd_tree(args, data_dir),
        Some(Commands::Export(args)) => cmd_export(args, data_dir),
        Some(Commands::Backup(args)) => cmd_backup(args, data_dir),
        Some(Commands::Restore(args)) => cmd_restore(args, data_dir),
        Some(Commands::Stats(args)) => cmd_stats(args, json, data_dir),
        Some(Commands::Search(args)) => cmd_search(args, json, data_dir),
        Some(Commands::Config(args)) => cmd_config(args, data_dir),
    }
}

/// Resolve a project by exact title, unique case-insensitive prefix, or id
fn resolve_project(store: &Store, needle: &str) -> Result<u64, Box<dyn Error>> {
    if let Some(p) = store.projects.iter().find(|p| p.title == needle) {
        return Ok(p.id);
    }
    let lower = needle.to_lowercase();
    let prefix_hits: Vec<u64> = store
        .projects
        .iter()
        .filter(|p| p.title.to_lowercase().starts_with(&lower))
        .map(|p| p.id)
        .collect();
    match prefix_hits.as_slice() {
        [only] => return Ok(*only),
        [_, ..] => return Err(format!("'{needle}' matches more than one project").into()),
        [] => {}
    }
    if let Ok(id) = needle.parse::<u64>() {
        if store.project(id).is_some() {
            return Ok(id);
        }
    }
    Err(format!("no project matching '{needle}'").into())
}

fn cmd_init(args: InitArgs, data_dir: Option<&str>) -> Result<(), Box<dyn Error>> {
    let root = match data_dir {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };
    let target = root.join(blob::DATA_DIR_NAME);
    if target.exists() && !args.force {
        return Err(format!(
            "{} already exists (use --force to reinitialize)",
            target.display()
        )
        .into());
    }
    let dir = blob::init_data_dir(&root, &Base64Armor)?;
    settings_io::write_settings(&dir, &Default::default())?;
    println!("initialized {}", dir.display());
    Ok(())
}

fn cmd_projects(json: bool, data_dir: Option<&str>) -> Result<(), Box<dyn Error>> {
    let ctx = Context::load(data_dir)?;
    let ids = ctx.store.project_group();
    if json {
        let projects: Vec<_> = ids.iter().filter_map(|id| ctx.store.project(*id)).collect();
        println!("{}", serde_json::to_string_pretty(&projects)?);
        return Ok(());
    }
    if ids.is_empty() {
        println!("no projects yet (try `fo new <title>`)");
        return Ok(());
    }
    for id in ids {
        if let Some(project) = ctx.store.project(id) {
            println!("{}", output::project_line(&ctx.store, project));
        }
    }
    Ok(())
}

fn cmd_new(args: NewArgs, data_dir: Option<&str>) -> Result<(), Box<dyn Error>> {
    let mut ctx = Context::load(data_dir)?;
    let id = project_ops::create_project(
        &mut ctx.store,
        ProjectFields {
            title: args.title.clone(),
            genre: args.genre,
            description: args.description,
            target_word_count: args.target,
        },
    )?;
    ctx.save()?;
    println!("created project '{}' ({})", args.title, id);
    Ok(())
}

/// Resolve a folder within a project by name
fn resolve_folder(store: &Store, project_id: u64, name: &str) -> Result<u64, Box<dyn Error>> {
    let hits: Vec<u64> = store
        .folders
        .iter()
        .filter(|f| f.project_id == project_id && f.name == name)
        .map(|f| f.id)
        .collect();
    match hits.as_slice() {
        [only] => Ok(*only),
        [] => Err(format!("no folder named '{name}'").into()),
        _ => Err(format!("'{name}' names more than one folder").into()),
    }
}

fn cmd_add(args: AddArgs, data_dir: Option<&str>) -> Result<(), Box<dyn Error>> {
    let mut ctx = Context::load(data_dir)?;
    let pid = resolve_project(&ctx.store, &args.project)?;
    let kind = DocKind::parse_name(&args.kind)
        .ok_or_else(|| format!("unknown document kind '{}'", args.kind))?;
    let folder_id = match args.folder.as_deref() {
        Some(name) => Some(resolve_folder(&ctx.store, pid, name)?),
        None => None,
    };
    let id = document_ops::create_document(
        &mut ctx.store,
        pid,
        folder_id,
        document_ops::DocumentFields {
            title: args.title.clone(),
            kind,
        },
    )?;
    ctx.save()?;
    println!("added {} '{}' ({})", kind.name(), args.title, id);
    Ok(())
}

fn cmd_mkdir(args: MkdirArgs, data_dir: Option<&str>) -> Result<(), Box<dyn Error>> {
    let mut ctx = Context::load(data_dir)?;
    let pid = resolve_project(&ctx.store, &args.project)?;
    let parent_id = match args.parent.as_deref() {
        Some(name) => Some(resolve_folder(&ctx.store, pid, name)?),
        None => None,
    };
    let id = folder_ops::create_folder(&mut ctx.store, pid, &args.name, parent_id)?;
    ctx.save()?;
    println!("created folder '{}' ({})", args.name, id);
    Ok(())
}

fn cmd_tree(args: TreeArgs, data_dir: Option<&str>) -> Result<(), Box<dyn Error>> {
    let ctx = Context::load(data_dir)?;
    let pid = resolve_project(&ctx.store, &args.project)?;
    for line in output::render_tree(&ctx.store, pid) {
        println!("{line}");
    }
    Ok(())
}

fn cmd_export(args: ExportArgs, data_dir: Option<&str>) -> Result<(), Box<dyn Error>> {
    let ctx = Context::load(data_dir)?;
    let pid = resolve_project(&ctx.store, &args.project)?;
    let draft = export::compile_draft(&ctx.store, pid)?;

    let title = &ctx.store.project(pid).expect("resolved above").title;
    let out_dir = match args.out {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };
    let path = out_dir.join(export::draft_filename(title));
    blob::atomic_write(&path, draft.as_bytes())?;
    println!("exported {}", path.display());
    Ok(())
}

fn cmd_backup(args: BackupArgs, data_dir: Option<&str>) -> Result<(), Box<dyn Error>> {
    let ctx = Context::load(data_dir)?;
    let out_dir = match args.out {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };
    let path = export::write_backup(&ctx.store, &out_dir)?;
    println!("backup written to {}", path.display());
    Ok(())
}

fn cmd_restore(args: RestoreArgs, data_dir: Option<&str>) -> Result<(), Box<dyn Error>> {
    let mut ctx = Context::load(data_dir)?;
    let restored = export::restore_backup(&PathBuf::from(&args.file))?;
    let projects = restored.projects.len();
    let documents = restored.documents.len();
    ctx.store = restored;
    ctx.save()?;
    settings_io::write_settings(&ctx.data_dir, &ctx.store.settings)?;
    println!("restored {projects} projects, {documents} documents");
    Ok(())
}

fn cmd_stats(args: StatsArgs, json: bool, data_dir: Option<&str>) -> Result<(), Box<dyn Error>> {
    let ctx = Context::load(data_dir)?;
    let pid = resolve_project(&ctx.store, &args.project)?;
    let project = ctx.store.project(pid).expect("resolved above");

    let words = project_ops::project_word_count(&ctx.store, pid);
    let docs: Vec<_> = ctx
        .store
        .documents
        .iter()
        .filter(|d| d.project_id == pid)
        .collect();
    let chapters = docs.iter().filter(|d| d.kind == DocKind::Chapter).count();

    if json {
        println!(
            "{}",
            serde_json::json!({
                "project": project.title,
                "chapter_words": words,
                "target_words": project.target_word_count,
                "documents": docs.len(),
                "chapters": chapters,
                "folders": ctx.store.folders.iter().filter(|f| f.project_id == pid).count(),
            })
        );
        return Ok(());
    }

    println!("{}", project.title);
    println!("  chapter words: {words}");
    if project.target_word_count > 0 {
        println!(
            "  target: {} ({}%)",
            project.target_word_count,
            (words * 100) / project.target_word_count.max(1)
        );
    }
    println!("  documents: {} ({} chapters)", docs.len(), chapters);
    Ok(())
}

fn cmd_search(args: SearchArgs, json: bool, data_dir: Option<&str>) -> Result<(), Box<dyn Error>> {
    let ctx = Context::load(data_dir)?;
    let pid = resolve_project(&ctx.store, &args.project)?;

    let mut results = Vec::new();
    for id in order_all_documents(&ctx.store, pid) {
        let Some(doc) = ctx.store.document(id) else {
            continue;
        };
        let mut search = SearchState::new();
        search.set_query(&doc.content, &args.query);
        if search.count() > 0 {
            results.push((doc.title.clone(), search.count()));
        }
    }

    if json {
        let entries: Vec<_> = results
            .iter()
            .map(|(title, count)| serde_json::json!({"document": title, "matches": count}))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    if results.is_empty() {
        println!("no matches for '{}'", args.query);
        return Ok(());
    }
    for (title, count) in results {
        println!("{title}: {count} matches");
    }
    Ok(())
}

/// Every document of the project, walking the tree in display order
fn order_all_documents(store: &Store, project_id: u64) -> Vec<u64> {
    fn walk(store: &Store, project_id: u64, folder_id: Option<u64>, out: &mut Vec<u64>) {
        for fid in store.folder_group(project_id, folder_id) {
            walk(store, project_id, Some(fid), out);
        }
        out.extend(store.document_group(project_id, folder_id));
    }
    let mut out = Vec::new();
    walk(store, project_id, None, &mut out);
    out
}

fn cmd_config(args: ConfigArgs, data_dir: Option<&str>) -> Result<(), Box<dyn Error>> {
    let ctx = Context::load(data_dir)?;
    match args.value {
        Some(value) => {
            settings_io::update_settings_key(&ctx.data_dir, &args.key, &value)?;
            println!("{} = {}", args.key, value);
            Ok(())
        }
        None => {
            let table = toml::Value::try_from(&ctx.store.settings)?;
            match table.get(&args.key) {
                Some(value) => {
                    println!("{value}");
                    Ok(())
                }
                None => Err(format!("unknown settings key '{}'", args.key).into()),
            }
        }
    }
}
