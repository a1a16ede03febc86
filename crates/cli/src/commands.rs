//! Subcommands and their output

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use taskman_core::form::{CreateForm, EditModal};
use taskman_core::store::TaskStore;
use taskman_core::task::{FieldErrors, SortKey, Task, TaskStatus};

#[derive(Parser, Debug)]
#[command(name = "taskman", version, about = "Manage tasks on a task REST API")]
pub struct Cli {
    /// Base URL of the task API (overrides TASKMAN_API_BASE)
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// List tasks
    List {
        /// Reorder locally by `status` or `due-date`
        #[arg(long)]
        sort: Option<SortKey>,
    },
    /// Create a task
    Add {
        title: String,
        #[arg(long, short)]
        description: Option<String>,
        #[arg(long, short)]
        status: Option<TaskStatus>,
        /// Due date as YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
    },
    /// Edit fields of a task
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, short)]
        description: Option<String>,
        #[arg(long, short)]
        status: Option<TaskStatus>,
        /// Due date as YYYY-MM-DD, or an empty string to clear it
        #[arg(long)]
        due: Option<String>,
    },
    /// Change only the status of a task
    Status { id: i64, status: TaskStatus },
    /// Delete a task
    Delete { id: i64 },
}

pub async fn run(command: Commands, store: &TaskStore) -> anyhow::Result<()> {
    match command {
        Commands::List { sort } => {
            load(store).await?;
            if let Some(by) = sort {
                store.sort(by).await;
            }
            print!("{}", render_tasks(&store.tasks().await));
        }
        Commands::Add {
            title,
            description,
            status,
            due,
        } => {
            let mut form = CreateForm::new();
            form.fields.title = title;
            form.fields.description = description.unwrap_or_default();
            form.fields.status = status.unwrap_or_default();
            form.fields.due_date = due.unwrap_or_default();

            match form.submit(store).await {
                Some(task) => println!("Task added with ID {}", task.id),
                None => bail!("Task not created:\n{}", render_errors(form.errors())),
            }
        }
        Commands::Edit {
            id,
            title,
            description,
            status,
            due,
        } => {
            load(store).await?;
            let task = store
                .find(id)
                .await
                .with_context(|| format!("Task {} not found", id))?;

            let mut modal = EditModal::open(&task);
            if let Some(title) = title {
                modal.fields.title = title;
            }
            if let Some(description) = description {
                modal.fields.description = description;
            }
            if let Some(status) = status {
                modal.fields.status = status;
            }
            if let Some(due) = due {
                modal.fields.due_date = due;
            }

            match modal.save(store).await {
                Some(task) => print!("{}", render_tasks(&[task])),
                None => bail!("Task {} not saved:\n{}", id, render_errors(modal.errors())),
            }
        }
        Commands::Status { id, status } => {
            load(store).await?;
            let task = store
                .change_status(id, status)
                .await
                .map_err(|e| anyhow::anyhow!(e.normalized()))?;
            println!("Task {} is now {}", task.id, task.status);
        }
        Commands::Delete { id } => {
            if !store.remove(id).await {
                let message = store.error().await.unwrap_or_default();
                bail!("Task {} not deleted: {}", id, message);
            }
            println!("Task {} deleted", id);
        }
    }

    Ok(())
}

async fn load(store: &TaskStore) -> anyhow::Result<()> {
    store.load().await;
    if let Some(error) = store.error().await {
        bail!("Failed to load tasks: {}", error);
    }
    Ok(())
}

fn render_tasks(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks yet.\n".to_string();
    }

    let mut out = String::new();
    for task in tasks {
        out.push_str(&format!("#{:<5} {:<12} {}", task.id, task.status, task.title));
        if let Some(due) = task.due_date {
            out.push_str(&format!("  (due {})", due));
        }
        out.push('\n');
        if let Some(description) = &task.description {
            out.push_str(&format!("       {}\n", description));
        }
    }
    out
}

fn render_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("  {}: {}", field, message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_with_sort() {
        let cli = Cli::try_parse_from(["taskman", "list", "--sort", "due-date"]).unwrap();
        match cli.command {
            Commands::List { sort } => assert_eq!(sort, Some(SortKey::DueDate)),
            c => panic!("Expected List, got: {:?}", c),
        }
    }

    #[test]
    fn test_parse_status_and_api_base() {
        let cli = Cli::try_parse_from([
            "taskman",
            "status",
            "3",
            "in-progress",
            "--api-base",
            "http://tasks.test/api",
        ])
        .unwrap();

        assert_eq!(cli.api_base.as_deref(), Some("http://tasks.test/api"));
        match cli.command {
            Commands::Status { id, status } => {
                assert_eq!(id, 3);
                assert_eq!(status, TaskStatus::InProgress);
            }
            c => panic!("Expected Status, got: {:?}", c),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_status() {
        assert!(Cli::try_parse_from(["taskman", "status", "3", "someday"]).is_err());
    }

    #[test]
    fn test_render_tasks() {
        let tasks = vec![Task {
            id: 7,
            title: "Ship it".to_string(),
            description: Some("release notes".to_string()),
            status: TaskStatus::Done,
            due_date: "2025-01-01".parse().ok(),
        }];

        assert_eq!(
            render_tasks(&tasks),
            "#7     DONE         Ship it  (due 2025-01-01)\n       release notes\n"
        );
        assert_eq!(render_tasks(&[]), "No tasks yet.\n");
    }

    #[test]
    fn test_render_errors() {
        let mut errors = FieldErrors::new();
        errors.insert("title", "Title is required");
        assert_eq!(render_errors(&errors), "  title: Title is required");
    }
}
