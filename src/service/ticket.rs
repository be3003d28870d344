use super::{CreatedAssistant, ServiceError};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

pub type CreationResult = Result<CreatedAssistant, ServiceError>;

#[derive(Debug)]
pub enum TicketStatus {
    Pending,
    Completed(CreationResult),
}

/// Completion channel scoped to a single dispatched creation request.
#[derive(Debug)]
pub struct CreationTicket {
    request_id: String,
    result_rx: Receiver<CreationResult>,
}

/// Worker half of a [`CreationTicket`]; reports exactly one result.
#[derive(Debug)]
pub struct CreationReporter {
    request_id: String,
    result_tx: Sender<CreationResult>,
}

impl CreationTicket {
    pub fn channel(request_id: &str) -> (CreationReporter, CreationTicket) {
        let (tx, rx) = mpsc::channel();
        (
            CreationReporter {
                request_id: request_id.to_string(),
                result_tx: tx,
            },
            CreationTicket {
                request_id: request_id.to_string(),
                result_rx: rx,
            },
        )
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn try_status(&self) -> TicketStatus {
        match self.result_rx.try_recv() {
            Ok(result) => TicketStatus::Completed(result),
            Err(TryRecvError::Empty) => TicketStatus::Pending,
            Err(TryRecvError::Disconnected) => {
                TicketStatus::Completed(Err(ServiceError::Disconnected))
            }
        }
    }

    pub fn wait_timeout(&self, timeout: Duration) -> TicketStatus {
        match self.result_rx.recv_timeout(timeout) {
            Ok(result) => TicketStatus::Completed(result),
            Err(RecvTimeoutError::Timeout) => TicketStatus::Pending,
            Err(RecvTimeoutError::Disconnected) => {
                TicketStatus::Completed(Err(ServiceError::Disconnected))
            }
        }
    }
}

impl CreationReporter {
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn report(self, result: CreationResult) {
        let _ = self.result_tx.send(result);
    }
}
