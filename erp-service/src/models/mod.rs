//! Domain models for erp-service.

mod customer;
mod invoice;
mod records;

pub use customer::{Customer, CustomerInput, CustomerType, PaymentTerms};
pub use invoice::{
    CreateInvoiceRequest, Invoice, InvoiceItem, InvoiceStatus, ItemInput, ListInvoicesFilter,
    NewInvoice, PaymentEvent, PaymentInput, PaymentUpdate,
};
pub use records::{
    AccountingTransaction, BlastingRecord, DateRange, DispatchRecord, DrillingRecord,
    LoadingRecord, ProductionRecord, TransactionType, TransportRecord,
};
