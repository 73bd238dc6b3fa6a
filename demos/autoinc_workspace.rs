//! Move the focused container to the first free workspace number.

use anyhow::Result;
use sway_ipc::criteria::{Criteria, FOCUSED};
use sway_ipc::Connection;

/// First workspace number not currently in use, skipping unnumbered
/// workspaces (their `num` is -1)
fn first_free_workspace_number(conn: &mut Connection) -> Result<i32> {
    let mut nums: Vec<i32> = conn
        .get_workspaces()?
        .iter()
        .map(|ws| ws.num)
        .filter(|&num| num > -1)
        .collect();
    nums.sort_unstable();

    let mut free = 1;
    for num in nums {
        if num > free {
            break;
        }
        free = num + 1;
    }
    Ok(free)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut conn = Connection::connect()?;
    let next = first_free_workspace_number(&mut conn)?;
    let criteria = Criteria::new().con_id(FOCUSED);
    for result in conn.run_command(&format!(
        "{criteria} move to workspace number {next}, focus"
    ))? {
        if !result.success {
            eprintln!("command failed: {:?}", result.error);
        }
    }
    Ok(())
}
