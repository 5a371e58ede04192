//! The export/import manager.

use std::collections::HashSet;

use tracing::{debug, info, warn};
use xbridge_codec::{ReserveTransfer, WireCodec};
use xbridge_notarization::NotarizationLedger;
use xbridge_proof::PartialTransactionProof;
use xbridge_types::{BridgeParams, CurrencyId, Hash256, TypesError};
use xbridge_utils::StatsCounter;

use crate::batch::{BatchTotals, ExportBatch, OpenBatch};
use crate::error::SettlementError;
use crate::import::{ImportContext, ImportOutcome, ImportReport};
use crate::token::{ImportKey, TokenManager};

const STAT_RECORDED: &str = "transfers_recorded";
const STAT_BATCHES: &str = "batches_closed";
const STAT_APPLIED: &str = "imports_applied";
const STAT_SKIPPED: &str = "imports_skipped";
const STAT_REJECTED: &str = "imports_rejected";

/// Batches outbound transfers by source height and settles inbound
/// transfers at most once each.
///
/// Batches tile the height axis from the genesis height in steps of the
/// batch interval. Windows that saw no transfers are skipped rather than
/// stored.
pub struct ExportImportManager {
    codec: WireCodec,
    source_system: CurrencyId,
    interval: u32,
    retention_window: usize,

    open: OpenBatch,
    ready: Vec<ExportBatch>,
    imported: HashSet<ImportKey>,
    stats: StatsCounter,
}

impl ExportImportManager {
    pub fn new(params: &BridgeParams) -> Result<Self, SettlementError> {
        if params.batch_interval == 0 {
            return Err(TypesError::InvalidParams("batch_interval must be positive".into()).into());
        }
        if params.retention_window == 0 {
            return Err(TypesError::InvalidParams("retention_window must be positive".into()).into());
        }
        Ok(Self {
            codec: WireCodec::new(params.max_aux_depth),
            source_system: params.source_system_id,
            interval: params.batch_interval,
            retention_window: params.retention_window,
            open: OpenBatch::new(params.genesis_height),
            ready: Vec::new(),
            imported: HashSet::new(),
            stats: StatsCounter::new(&[
                STAT_RECORDED,
                STAT_BATCHES,
                STAT_APPLIED,
                STAT_SKIPPED,
                STAT_REJECTED,
            ]),
        })
    }

    pub fn codec(&self) -> &WireCodec {
        &self.codec
    }

    pub fn stats(&self) -> &StatsCounter {
        &self.stats
    }

    /// Start height of the batch currently accepting transfers.
    pub fn open_batch_start(&self) -> u32 {
        self.open.start_height
    }

    /// Transfers waiting in the open batch.
    pub fn pending_transfers(&self) -> usize {
        self.open.transfers.len()
    }

    // ── Export path ─────────────────────────────────────────────────────

    /// Add `transfer`, observed at source `height`, to the open batch,
    /// closing it first if `height` lies past its window.
    pub fn record_outbound_transfer(
        &mut self,
        height: u32,
        transfer: ReserveTransfer,
    ) -> Result<(), SettlementError> {
        transfer.validate(self.codec.max_aux_depth())?;
        self.check_height(height)?;

        let rolls = height - self.open.start_height >= self.interval;
        let mut totals = if rolls {
            BatchTotals::default()
        } else {
            self.open.totals.clone()
        };
        totals.add(&transfer)?;

        self.advance_height(height)?;
        self.open.totals = totals;
        self.open.transfers.push(transfer);
        self.open.last_height = Some(height);
        self.stats.increment(STAT_RECORDED);
        Ok(())
    }

    /// Note that the source chain reached `height`. Once the open batch's
    /// window is crossed it is closed at its boundary, and the next batch
    /// opens at the last boundary at or below `height`. Returns whether a
    /// batch was stored.
    pub fn advance_height(&mut self, height: u32) -> Result<bool, SettlementError> {
        self.check_height(height)?;
        let start = self.open.start_height;
        let elapsed = height - start;
        if elapsed < self.interval {
            return Ok(false);
        }
        let closed = self.close_at(start + self.interval)?;
        let boundary = start + self.interval * (elapsed / self.interval);
        if boundary > self.open.start_height {
            self.open = OpenBatch::new(boundary);
        }
        Ok(closed)
    }

    /// Close the open batch at exactly `height`, ahead of its boundary.
    /// Every transfer recorded so far must lie below `height`. Returns
    /// whether any batch was stored, including one closed at a boundary
    /// `height` crossed.
    pub fn flush(&mut self, height: u32) -> Result<bool, SettlementError> {
        self.check_height(height)?;
        let advanced = self.advance_height(height)?;
        if self.open.transfers.is_empty() {
            return Ok(advanced);
        }
        if let Some(last) = self.open.last_height {
            if height <= last {
                return Err(SettlementError::HeightRegression {
                    height,
                    floor: last + 1,
                });
            }
        }
        Ok(self.close_at(height)? || advanced)
    }

    fn check_height(&self, height: u32) -> Result<(), SettlementError> {
        if height < self.open.start_height {
            return Err(SettlementError::HeightRegression {
                height,
                floor: self.open.start_height,
            });
        }
        Ok(())
    }

    fn close_at(&mut self, end: u32) -> Result<bool, SettlementError> {
        if self.open.transfers.is_empty() {
            self.open = OpenBatch::new(end);
            return Ok(false);
        }
        let batch = self.open.close(end, &self.codec, self.source_system)?;
        info!(
            start = batch.start_height,
            end = batch.end_height,
            transfers = batch.len(),
            commitment = %batch.commitment.hash_transfers,
            "export batch closed"
        );
        self.ready.push(batch);
        self.stats.increment(STAT_BATCHES);
        Ok(true)
    }

    /// Closed batches whose `[start, end)` intersects `[from, to)`, in
    /// ascending height order.
    pub fn get_ready_exports_by_range(&self, from: u32, to: u32) -> Vec<&ExportBatch> {
        self.ready.iter().filter(|b| b.overlaps(from, to)).collect()
    }

    // ── Import path ─────────────────────────────────────────────────────

    pub fn is_imported(&self, key: &ImportKey) -> bool {
        self.imported.contains(key)
    }

    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }

    /// Verify and settle an inbound export.
    ///
    /// `notarization_ref` is the hash of a canonical record still inside the
    /// retention window. The proof must reach that record's state root and
    /// reveal exactly one export commitment, which must match
    /// `serialized_transfers`. Any failure leaves the manager and `tokens`
    /// untouched. Transfers whose source output was imported before are
    /// skipped and reported as such.
    pub fn submit_import<T: TokenManager + ?Sized>(
        &mut self,
        ledger: &NotarizationLedger,
        tokens: &mut T,
        proof: &PartialTransactionProof,
        serialized_transfers: &[u8],
        notarization_ref: &Hash256,
    ) -> Result<ImportReport, SettlementError> {
        let ctx = ImportContext {
            codec: &self.codec,
            ledger,
            retention_window: self.retention_window,
            source_system: self.source_system,
        };
        let plan = match ctx.verify(proof, serialized_transfers, notarization_ref) {
            Ok(plan) => plan,
            Err(e) => {
                warn!(notarization = %notarization_ref, error = %e, "import rejected");
                self.stats.increment(STAT_REJECTED);
                return Err(e);
            }
        };

        let mut outcomes = Vec::with_capacity(plan.transfers.len());
        let mut launched = Vec::new();
        for staged in plan.transfers {
            if !self.imported.insert(staged.key) {
                debug!(key = %staged.key, "transfer already imported, skipping");
                self.stats.increment(STAT_SKIPPED);
                outcomes.push((staged.key, ImportOutcome::AlreadyImported));
                continue;
            }
            tokens.apply_transfer_effect(staged.key, &staged.transfer);
            launched.extend(staged.launch);
            self.stats.increment(STAT_APPLIED);
            outcomes.push((staged.key, ImportOutcome::Applied));
        }
        if !launched.is_empty() {
            tokens.launch_currencies(&launched);
        }

        let report = ImportReport {
            txid: plan.txid,
            notarization: *notarization_ref,
            outcomes,
            launched,
        };
        info!(
            txid = %report.txid,
            applied = report.applied(),
            skipped = report.skipped(),
            "import settled"
        );
        Ok(report)
    }
}
