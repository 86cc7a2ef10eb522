//! Emergency data flush.
//!
//! Bound once to a designated control: confirm with the user, clear the
//! record store, reload the page. Flushing is destructive, so declining
//! the prompt must leave everything untouched; once confirmed, the
//! reload happens no matter how the flush settles, bounded by a hard
//! timeout so a wedged backend cannot strand the page.

use crate::pipeline::Runtime;
use futures::future::{Either, select};
use tracing::{debug, warn};

const FLUSH_TIMEOUT_MS: u32 = 10_000;

impl Runtime {
    pub async fn flush_and_reload(&self) {
        let message = self.translator.t("confirm.deleteall.msg");
        let heading = self.translator.t("confirm.deleteall.heading");
        if !self.ui.confirm(&message, &heading).await {
            debug!("emergency flush declined");
            return;
        }

        match select(
            self.store.flush(),
            self.platform.sleep_ms(FLUSH_TIMEOUT_MS),
        )
        .await
        {
            Either::Left((Ok(()), _)) => debug!("record store flushed"),
            Either::Left((Err(err), _)) => {
                warn!("flush failed, reloading anyway: {err:#}");
            }
            Either::Right(((), _)) => {
                warn!("flush timed out after {FLUSH_TIMEOUT_MS}ms, reloading anyway");
            }
        }

        self.platform.reload();
    }
}
