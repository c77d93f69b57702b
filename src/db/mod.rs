use crate::Error;
use crate::data::{Invoice, InvoiceStatus, LandingSection, Order, ServiceOffering};
use redb::{Database, ReadableTable, TableDefinition, TypeName, Value, WriteTransaction};
use serde::{Deserialize, Serialize};
use std::any::type_name;
use std::fmt::Debug;
use std::path::Path;
use uuid::Uuid;

const DB_FILE: &str = "faktur.redb";

const ORDERS_TABLE: TableDefinition<&str, Bincode<Order>> = TableDefinition::new("orders");
const INVOICES_TABLE: TableDefinition<&str, Bincode<Invoice>> = TableDefinition::new("invoices");
const SERVICES_TABLE: TableDefinition<&str, Bincode<ServiceOffering>> =
    TableDefinition::new("services");
const LANDING_CONTENT_TABLE: TableDefinition<&str, Bincode<LandingSection>> =
    TableDefinition::new("landing_content");
const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

const INVOICE_NUMBER_COUNTER: &str = "invoice_number";

pub(crate) const KEY_DATE_FORMAT: &str = "%Y-%m-%d";

/// This can only be called once
fn get_db(data_folder: &Path) -> Database {
    let db_file = DB_FILE;
    let path = data_folder.join(db_file);

    let db = Database::create(path).expect("can create/open db file");
    if let Ok(write_txn) = db.begin_write() {
        let _ = write_txn.open_table(ORDERS_TABLE);
        let _ = write_txn.open_table(INVOICES_TABLE);
        let _ = write_txn.open_table(SERVICES_TABLE);
        let _ = write_txn.open_table(LANDING_CONTENT_TABLE);
        let _ = write_txn.open_table(COUNTERS_TABLE);
        let _ = write_txn.commit();
    }

    db
}

#[derive(Debug, Clone)]
pub struct DateRange {
    pub from: String,
    pub to: String,
}

#[derive(Debug)]
pub struct DB {
    db: Database,
}

impl DB {
    /// This can only be called once
    pub fn new(data_folder: &Path) -> Self {
        Self {
            db: get_db(data_folder),
        }
    }

    pub(crate) fn get_key_for_order(order: &Order) -> String {
        format!("{}_{}", order.created_on.format(KEY_DATE_FORMAT), order.id)
    }

    // ORDERS
    pub fn get_orders(&self) -> Result<Vec<Order>, Error> {
        let table = self
            .db
            .begin_read()
            .map_err(|e| Error::Store(e.to_string()))?
            .open_table(ORDERS_TABLE)
            .map_err(|e| Error::Store(e.to_string()))?;

        let iter = table.iter().map_err(|e| Error::Store(e.to_string()))?;

        Ok(iter.filter_map(|r| r.map(|v| v.1.value()).ok()).collect())
    }

    pub fn get_orders_for_range(&self, date_range: &DateRange) -> Result<Vec<Order>, Error> {
        let table = self
            .db
            .begin_read()
            .map_err(|e| Error::Store(e.to_string()))?
            .open_table(ORDERS_TABLE)
            .map_err(|e| Error::Store(e.to_string()))?;

        // add \x7f, because it compares bit-wise, so date{something} doesn't match date_a324
        let iter = table
            .range(date_range.from.as_str()..=format!("{}\x7f", date_range.to.as_str()).as_str())
            .map_err(|e| Error::Store(e.to_string()))?;

        Ok(iter.filter_map(|r| r.map(|v| v.1.value()).ok()).collect())
    }

    /// Orders an invoice can currently be issued for.
    pub fn get_invoiceable_orders(&self) -> Result<Vec<Order>, Error> {
        Ok(self
            .get_orders()?
            .into_iter()
            .filter(|order| order.status.is_invoiceable())
            .collect())
    }

    pub fn create_or_update_order_and_refetch(&self, order: &Order) -> Result<Vec<Order>, Error> {
        let key = DB::get_key_for_order(order);
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| Error::Store(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(ORDERS_TABLE)
                .map_err(|e| Error::Store(e.to_string()))?;

            table
                .insert(key.as_str(), order)
                .map_err(|e| Error::Store(e.to_string()))?;
        }
        let res = self.fetch_orders(&write_txn)?;

        write_txn.commit().map_err(|e| Error::Store(e.to_string()))?;
        Ok(res)
    }

    fn fetch_orders(&self, write_txn: &WriteTransaction) -> Result<Vec<Order>, Error> {
        let table = write_txn
            .open_table(ORDERS_TABLE)
            .map_err(|e| Error::Store(e.to_string()))?;

        let iter = table.iter().map_err(|e| Error::Store(e.to_string()))?;

        Ok(iter.filter_map(|r| r.map(|v| v.1.value()).ok()).collect())
    }

    // INVOICES
    pub fn get_invoices(&self) -> Result<Vec<Invoice>, Error> {
        let table = self
            .db
            .begin_read()
            .map_err(|e| Error::Store(e.to_string()))?
            .open_table(INVOICES_TABLE)
            .map_err(|e| Error::Store(e.to_string()))?;

        let iter = table.iter().map_err(|e| Error::Store(e.to_string()))?;

        Ok(iter.filter_map(|r| r.map(|v| v.1.value()).ok()).collect())
    }

    pub fn get_invoice(&self, invoice_number: &str) -> Result<Option<Invoice>, Error> {
        let table = self
            .db
            .begin_read()
            .map_err(|e| Error::Store(e.to_string()))?
            .open_table(INVOICES_TABLE)
            .map_err(|e| Error::Store(e.to_string()))?;

        Ok(table
            .get(invoice_number)
            .map_err(|e| Error::Store(e.to_string()))?
            .map(|v| v.value()))
    }

    pub fn create_invoice_and_refetch(&self, invoice: &Invoice) -> Result<Vec<Invoice>, Error> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| Error::Store(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(INVOICES_TABLE)
                .map_err(|e| Error::Store(e.to_string()))?;

            table
                .insert(invoice.invoice_number.as_str(), invoice)
                .map_err(|e| Error::Store(e.to_string()))?;
        }
        let res = self.fetch_invoices(&write_txn)?;

        write_txn.commit().map_err(|e| Error::Store(e.to_string()))?;
        Ok(res)
    }

    pub fn update_invoice_status_and_refetch(
        &self,
        invoice_number: &str,
        status: InvoiceStatus,
    ) -> Result<Vec<Invoice>, Error> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| Error::Store(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(INVOICES_TABLE)
                .map_err(|e| Error::Store(e.to_string()))?;

            let res = table
                .get(invoice_number)
                .map_err(|e| Error::Store(e.to_string()))?
                .map(|v| v.value());

            let mut invoice = match res {
                None => {
                    return Err(Error::Store(format!(
                        "Invoice {invoice_number} does not exist and can't be updated."
                    )));
                }
                Some(v) => v,
            };
            invoice.status = status;

            table
                .insert(invoice_number, &invoice)
                .map_err(|e| Error::Store(e.to_string()))?;
        }
        let res = self.fetch_invoices(&write_txn)?;

        write_txn.commit().map_err(|e| Error::Store(e.to_string()))?;
        Ok(res)
    }

    fn fetch_invoices(&self, write_txn: &WriteTransaction) -> Result<Vec<Invoice>, Error> {
        let table = write_txn
            .open_table(INVOICES_TABLE)
            .map_err(|e| Error::Store(e.to_string()))?;

        let iter = table.iter().map_err(|e| Error::Store(e.to_string()))?;

        Ok(iter.filter_map(|r| r.map(|v| v.1.value()).ok()).collect())
    }

    /// Issues the next invoice number. The counter is persisted, so
    /// numbers keep increasing across restarts and are never reused,
    /// even when an invoice is deleted out-of-band.
    pub fn next_invoice_number(&self) -> Result<String, Error> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| Error::Store(e.to_string()))?;
        let next = {
            let mut table = write_txn
                .open_table(COUNTERS_TABLE)
                .map_err(|e| Error::Store(e.to_string()))?;

            let current = table
                .get(INVOICE_NUMBER_COUNTER)
                .map_err(|e| Error::Store(e.to_string()))?
                .map(|v| v.value())
                .unwrap_or(0);
            let next = current + 1;

            table
                .insert(INVOICE_NUMBER_COUNTER, next)
                .map_err(|e| Error::Store(e.to_string()))?;
            next
        };
        write_txn.commit().map_err(|e| Error::Store(e.to_string()))?;
        Ok(format!("INV-{:04}", next))
    }

    // SERVICES
    pub fn get_services(&self) -> Result<Vec<ServiceOffering>, Error> {
        let table = self
            .db
            .begin_read()
            .map_err(|e| Error::Store(e.to_string()))?
            .open_table(SERVICES_TABLE)
            .map_err(|e| Error::Store(e.to_string()))?;

        let iter = table.iter().map_err(|e| Error::Store(e.to_string()))?;

        Ok(iter.filter_map(|r| r.map(|v| v.1.value()).ok()).collect())
    }

    pub fn get_active_services(&self) -> Result<Vec<ServiceOffering>, Error> {
        Ok(self
            .get_services()?
            .into_iter()
            .filter(|service| service.is_active)
            .collect())
    }

    pub fn upsert_service_and_refetch(
        &self,
        service: &ServiceOffering,
    ) -> Result<Vec<ServiceOffering>, Error> {
        let key = service.id.to_string();
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| Error::Store(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(SERVICES_TABLE)
                .map_err(|e| Error::Store(e.to_string()))?;

            table
                .insert(key.as_str(), service)
                .map_err(|e| Error::Store(e.to_string()))?;
        }
        let res = {
            let table = write_txn
                .open_table(SERVICES_TABLE)
                .map_err(|e| Error::Store(e.to_string()))?;
            let iter = table.iter().map_err(|e| Error::Store(e.to_string()))?;
            iter.filter_map(|r| r.map(|v| v.1.value()).ok())
                .collect::<Vec<_>>()
        };

        write_txn.commit().map_err(|e| Error::Store(e.to_string()))?;
        Ok(res)
    }

    // LANDING CONTENT
    pub fn get_landing_sections(&self) -> Result<Vec<LandingSection>, Error> {
        let table = self
            .db
            .begin_read()
            .map_err(|e| Error::Store(e.to_string()))?
            .open_table(LANDING_CONTENT_TABLE)
            .map_err(|e| Error::Store(e.to_string()))?;

        let iter = table.iter().map_err(|e| Error::Store(e.to_string()))?;

        let mut sections: Vec<LandingSection> =
            iter.filter_map(|r| r.map(|v| v.1.value()).ok()).collect();
        sections.sort_by(|a, b| {
            a.section_order
                .cmp(&b.section_order)
                .then_with(|| a.section_name.cmp(&b.section_name))
        });
        Ok(sections)
    }

    pub fn upsert_landing_section_and_refetch(
        &self,
        section: &LandingSection,
    ) -> Result<Vec<LandingSection>, Error> {
        let key = section.id.to_string();
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| Error::Store(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(LANDING_CONTENT_TABLE)
                .map_err(|e| Error::Store(e.to_string()))?;

            table
                .insert(key.as_str(), section)
                .map_err(|e| Error::Store(e.to_string()))?;
        }
        write_txn.commit().map_err(|e| Error::Store(e.to_string()))?;
        self.get_landing_sections()
    }

    pub fn delete_landing_section_and_refetch(
        &self,
        id: &Uuid,
    ) -> Result<Vec<LandingSection>, Error> {
        let key = id.to_string();
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| Error::Store(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(LANDING_CONTENT_TABLE)
                .map_err(|e| Error::Store(e.to_string()))?;

            let res = table
                .get(key.as_str())
                .map_err(|e| Error::Store(e.to_string()))?
                .map(|v| v.value());
            if res.is_none() {
                return Err(Error::Store(format!(
                    "Section {key} does not exist and can't be deleted."
                )));
            }

            table
                .remove(key.as_str())
                .map_err(|e| Error::Store(e.to_string()))?;
        }
        write_txn.commit().map_err(|e| Error::Store(e.to_string()))?;
        self.get_landing_sections()
    }
}

#[derive(Debug)]
pub struct Bincode<T>(pub T);

impl<T> Value for Bincode<T>
where
    T: Debug + Serialize + for<'a> Deserialize<'a>,
{
    type SelfType<'a>
        = T
    where
        Self: 'a;
    type AsBytes<'a>
        = Vec<u8>
    where
        Self: 'a;

    fn as_bytes<'a, 'b: 'a>(value: &'a Self::SelfType<'b>) -> Self::AsBytes<'a>
    where
        Self: 'a,
        Self: 'b,
    {
        bincode::serialize(value).expect("can serialize with bincode")
    }

    fn fixed_width() -> Option<usize> {
        None
    }

    fn from_bytes<'a>(data: &'a [u8]) -> Self::SelfType<'a>
    where
        Self: 'a,
    {
        bincode::deserialize(data).expect("can deserialize using bincode")
    }

    fn type_name() -> redb::TypeName {
        TypeName::new(&format!("Bincode<{}>", type_name::<T>()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::currency::CurrencyValue;
    use crate::data::{Customer, OrderStatus, ServiceSnapshot};
    use chrono::NaiveDate;
    use std::fs::create_dir_all;
    use std::path::PathBuf;

    fn temp_data_folder() -> PathBuf {
        let folder = std::env::temp_dir().join(format!("faktur-test-{}", Uuid::now_v7()));
        create_dir_all(&folder).expect("can create temp folder");
        folder
    }

    fn order_on(date: NaiveDate) -> Order {
        Order {
            id: Uuid::now_v7(),
            created_on: date,
            customer: Customer {
                name: "Budi Santoso".into(),
                email: "budi@example.com".into(),
                phone: None,
                address: None,
            },
            service: ServiceSnapshot {
                id: Uuid::now_v7(),
                name: "Landing Page".into(),
                price: CurrencyValue::new(5_000_000),
            },
            requirements: None,
            budget_range: None,
            deadline: None,
            total_amount: CurrencyValue::new(5_000_000),
            downpayment_percentage: 0,
            downpayment_amount: CurrencyValue::zero(),
            remaining_amount: CurrencyValue::new(5_000_000),
            status: OrderStatus::Pending,
        }
    }

    #[test]
    fn orders_round_trip_and_range_scan() {
        let folder = temp_data_folder();
        let db = DB::new(&folder);

        let early = order_on(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        let late = order_on(NaiveDate::from_ymd_opt(2025, 6, 20).unwrap());
        db.create_or_update_order_and_refetch(&early)
            .expect("can store order");
        let all = db
            .create_or_update_order_and_refetch(&late)
            .expect("can store order");
        assert_eq!(all.len(), 2);

        let first_half = db
            .get_orders_for_range(&DateRange {
                from: "2025-01-01".into(),
                to: "2025-03-31".into(),
            })
            .expect("can scan range");
        assert_eq!(first_half.len(), 1);
        assert_eq!(first_half[0].id, early.id);
    }

    #[test]
    fn updating_an_order_keeps_a_single_record() {
        let folder = temp_data_folder();
        let db = DB::new(&folder);

        let mut order = order_on(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        db.create_or_update_order_and_refetch(&order)
            .expect("can store order");
        order.status = OrderStatus::InProgress;
        let all = db
            .create_or_update_order_and_refetch(&order)
            .expect("can update order");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status, OrderStatus::InProgress);
    }

    #[test]
    fn invoice_numbers_are_monotonic_across_reopen() {
        let folder = temp_data_folder();
        let first = {
            let db = DB::new(&folder);
            let a = db.next_invoice_number().expect("can issue number");
            let b = db.next_invoice_number().expect("can issue number");
            assert_eq!(a, "INV-0001");
            assert_eq!(b, "INV-0002");
            b
        };

        let db = DB::new(&folder);
        let c = db.next_invoice_number().expect("can issue number");
        assert_eq!(c, "INV-0003");
        assert!(c > first);
    }

    #[test]
    fn landing_sections_come_back_sorted() {
        let folder = temp_data_folder();
        let db = DB::new(&folder);

        let mut hero = LandingSection {
            id: Uuid::now_v7(),
            section_name: "hero".into(),
            title: Some("Jasa Digital".into()),
            subtitle: None,
            content: None,
            is_enabled: true,
            section_order: 2,
        };
        let about = LandingSection {
            id: Uuid::now_v7(),
            section_name: "about".into(),
            title: None,
            subtitle: None,
            content: Some("Tentang kami".into()),
            is_enabled: true,
            section_order: 1,
        };
        db.upsert_landing_section_and_refetch(&hero)
            .expect("can store section");
        let sections = db
            .upsert_landing_section_and_refetch(&about)
            .expect("can store section");
        assert_eq!(sections[0].section_name, "about");
        assert_eq!(sections[1].section_name, "hero");

        hero.section_order = 0;
        let sections = db
            .upsert_landing_section_and_refetch(&hero)
            .expect("can update section");
        assert_eq!(sections[0].section_name, "hero");

        let sections = db
            .delete_landing_section_and_refetch(&about.id)
            .expect("can delete section");
        assert_eq!(sections.len(), 1);
        assert!(db.delete_landing_section_and_refetch(&about.id).is_err());
    }
}
