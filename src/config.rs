use std::path::{Path, PathBuf};
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::Context;
use calloop::{LoopHandle, RegistrationToken};

use crate::state::State;

/// Spawns a polling thread that notices changes to `path`'s mtime and wakes
/// `State::reload_config` through the event loop, and registers the calloop
/// channel source that delivers those wake-ups. A dedicated thread because
/// calloop has no portable filesystem-watch source of its own.
pub fn init_watcher(
    path: PathBuf,
    loop_handle: &LoopHandle<'static, State>,
) -> anyhow::Result<(RegistrationToken, JoinHandle<()>)> {
    let (tx, channel) = calloop::channel::channel::<()>();
    let join_handle: JoinHandle<()> = std::thread::Builder::new()
        .name(format!("Config file watcher for: {}", path.to_string_lossy()))
        .spawn(move || {
            let path: &Path = path.as_ref();
            let mut last_mtime = path.metadata().and_then(|md| md.modified()).ok();
            loop {
                std::thread::sleep(Duration::from_secs(1));
                if let Some(new_mtime) = path
                    .metadata()
                    .and_then(|md| md.modified())
                    .ok()
                    .filter(|mtime| Some(mtime) != last_mtime.as_ref())
                {
                    tracing::debug!(?new_mtime, "config file change detected");
                    last_mtime = Some(new_mtime);
                    if tx.send(()).is_err() {
                        // Channel dropped: the event loop is gone, nothing
                        // left to notify.
                        break;
                    }
                }
            }
        })
        .context("failed to start config file watcher thread")?;

    let token = loop_handle
        .insert_source(channel, |event, (), state| {
            if let calloop::channel::Event::Msg(()) = event {
                state.reload_config();
            }
        })
        .map_err(|err| anyhow::anyhow!("failed to insert config file watcher source into event loop: {err}"))?;

    Ok((token, join_handle))
}
