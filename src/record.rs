/// CSV column label for the recipient address field.
pub const COLUMN_RECIPIENT_ADDRESS: &str = "آدرس گیرنده";

/// CSV column label for the recipient phone field.
pub const COLUMN_RECIPIENT_PHONE: &str = "تلفن گیرنده";

/// CSV column label for the order code field.
pub const COLUMN_ORDER_CODE: &str = "کد سفارش";

/// CSV column label for the recipient name field.
pub const COLUMN_RECIPIENT_NAME: &str = "نام گیرنده";

/// One row of the input table.
///
/// Each field mirrors one recognized CSV column. `None` means the column was
/// absent from the file (or the row was too short to reach it); `Some("")`
/// means the cell was present but empty. Both read back as the empty string
/// through the accessors, so downstream code never sees the difference.
///
/// Values are kept verbatim: no trimming, no numeric coercion. This is what
/// preserves phone numbers with leading zeros.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    /// Recipient postal address
    pub recipient_address: Option<String>,

    /// Recipient phone number
    pub recipient_phone: Option<String>,

    /// Order code identifying the shipment
    pub order_code: Option<String>,

    /// Recipient full name
    pub recipient_name: Option<String>,
}

impl Record {
    /// Returns the recipient address, defaulting to the empty string.
    #[must_use]
    pub fn recipient_address(&self) -> &str {
        self.recipient_address.as_deref().unwrap_or_default()
    }

    /// Returns the recipient phone, defaulting to the empty string.
    #[must_use]
    pub fn recipient_phone(&self) -> &str {
        self.recipient_phone.as_deref().unwrap_or_default()
    }

    /// Returns the order code, defaulting to the empty string.
    #[must_use]
    pub fn order_code(&self) -> &str {
        self.order_code.as_deref().unwrap_or_default()
    }

    /// Returns the recipient name, defaulting to the empty string.
    #[must_use]
    pub fn recipient_name(&self) -> &str {
        self.recipient_name.as_deref().unwrap_or_default()
    }
}
