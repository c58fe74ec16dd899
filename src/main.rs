use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use medigrasp_collab::sim::{SimCamera, SimRobotArm, SimSegmenter, SimVision};
use medigrasp_registry::{SubmitOptions, TaskAction, TaskRegistry};
use medigrasp_store::{Medicine, MedicineStore};
use medigrasp_workflow::Collaborators;

/// Medigrasp - prescription recognition and robotic medicine grasping
#[derive(Parser)]
#[command(name = "medigrasp")]
#[command(version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Recognize a prescription and print the medicine list
  Recognize {
    /// Fail the task if it runs longer than this (milliseconds)
    #[arg(long)]
    timeout_ms: Option<u64>,
  },

  /// Run the grasp workflow over a prescription
  Grasp {
    /// Seed medicine list (comma separated); recognized from the
    /// prescription image when omitted
    #[arg(long, value_delimiter = ',')]
    medicines: Option<Vec<String>>,

    /// Fail the task if it runs longer than this (milliseconds)
    #[arg(long)]
    timeout_ms: Option<u64>,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  let cli = Cli::parse();

  let store = MedicineStore::new();
  let registry = TaskRegistry::new(
    Collaborators {
      camera: Arc::new(SimCamera),
      vision: Arc::new(SimVision::default()),
      segmenter: Arc::new(SimSegmenter),
      robot: Arc::new(SimRobotArm),
    },
    store.clone(),
  );

  let (action, options) = match cli.command {
    Commands::Recognize { timeout_ms } => (
      TaskAction::Recognize,
      SubmitOptions {
        payload: serde_json::Value::Null,
        timeout_ms,
      },
    ),
    Commands::Grasp {
      medicines,
      timeout_ms,
    } => {
      let payload = match medicines {
        Some(names) => {
          let seeds: Vec<Medicine> = names.into_iter().map(Medicine::pending).collect();
          serde_json::to_value(seeds)?
        }
        None => serde_json::Value::Null,
      };
      (TaskAction::Grasp, SubmitOptions { payload, timeout_ms })
    }
  };

  let task_id = registry.submit(action, options)?;
  let record = loop {
    let record = registry.get_status(&task_id)?;
    if record.status.is_terminal() {
      break record;
    }
    tokio::time::sleep(Duration::from_millis(50)).await;
  };

  println!("{}", serde_json::to_string_pretty(&record)?);

  let pending = registry.pending_medicines();
  if !pending.is_empty() {
    println!("pending medicines: {}", serde_json::to_string(&pending)?);
  }

  if let Some(error) = record.error {
    bail!("task failed: {}", error);
  }
  Ok(())
}
