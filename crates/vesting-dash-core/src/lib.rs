pub mod cell;
pub mod domain;
pub mod orchestrator;
pub mod pagination;
pub mod pan;
pub mod ports;
pub mod session;
pub mod state_machine;
pub mod table;

pub use cell::{
    column_title, render_cell, BadgeIcon, BadgeTone, CellDisplay, CellValue, PlaceholderKind,
    PlainValue, Renderer, Row, StatusBadge,
};
pub use domain::{
    CancelTarget, CancellationRequest, EncodedUtxo, SignedTx, StatusKind, TxId, TxStatus,
    UnsignedTx, Witness,
};
pub use orchestrator::{
    CancelError, CancelObserver, CancelReport, CancellationCoordinator, StepTimeouts,
};
pub use pagination::{Pagination, PAGE_SIZE_OPTIONS};
pub use pan::{
    CursorHint, PanController, PanOutcome, PanState, PointerEvent, PointerPhase,
    SENSITIVITY_THRESHOLD,
};
pub use ports::{PortError, TransactionServicePort, WalletConnectorPort, WalletPort};
pub use session::{ConnectReport, SessionSnapshot, WalletSession};
pub use state_machine::{
    cancel_transition, CancelAction, CancelStatus, CancelStep, StateTransition, TransitionError,
};
pub use table::{
    CancelAffordance, CancelReadiness, ColumnHeader, PaginationFooter, RenderedRow, TableBody,
    TableView, TransactionTable,
};
