//! Schema registry: which fields each entity requires, and the allow-listed
//! column identifiers that are permitted to appear in SQL text.

/// The three record kinds the service persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Patient,
    Doctor,
    Visit,
}

impl EntityKind {
    /// Backing table name.
    pub fn table(self) -> &'static str {
        match self {
            EntityKind::Patient => PatientColumn::TABLE,
            EntityKind::Doctor => DoctorColumn::TABLE,
            EntityKind::Visit => VisitColumn::TABLE,
        }
    }

    /// Fields a full record of this kind must carry (excluding `id`).
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            EntityKind::Patient => &["first_name", "last_name", "date_of_birth", "gender"],
            EntityKind::Doctor => &["first_name", "last_name", "specialization"],
            EntityKind::Visit => &["patient_id", "doctor_id", "visit_date", "diagnosis"],
        }
    }
}

/// An allow-listed, non-id column of one table.
///
/// Implementors are closed enums, so a `Column` value can only ever render
/// one of a fixed set of identifiers.
pub trait Column: Copy + Eq + std::fmt::Debug + 'static {
    /// Owning table.
    const TABLE: &'static str;
    /// Entity kind this column set belongs to.
    const KIND: EntityKind;
    /// Every column in schema order.
    const ALL: &'static [Self];

    /// SQL identifier (and JSON key) for this column.
    fn name(self) -> &'static str;

    /// Map a caller-supplied key onto a column; `None` for anything unknown.
    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatientColumn {
    FirstName,
    LastName,
    DateOfBirth,
    Gender,
}

impl Column for PatientColumn {
    const TABLE: &'static str = "patients";
    const KIND: EntityKind = EntityKind::Patient;
    const ALL: &'static [Self] = &[
        PatientColumn::FirstName,
        PatientColumn::LastName,
        PatientColumn::DateOfBirth,
        PatientColumn::Gender,
    ];

    fn name(self) -> &'static str {
        match self {
            PatientColumn::FirstName => "first_name",
            PatientColumn::LastName => "last_name",
            PatientColumn::DateOfBirth => "date_of_birth",
            PatientColumn::Gender => "gender",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoctorColumn {
    FirstName,
    LastName,
    Specialization,
}

impl Column for DoctorColumn {
    const TABLE: &'static str = "doctors";
    const KIND: EntityKind = EntityKind::Doctor;
    const ALL: &'static [Self] = &[
        DoctorColumn::FirstName,
        DoctorColumn::LastName,
        DoctorColumn::Specialization,
    ];

    fn name(self) -> &'static str {
        match self {
            DoctorColumn::FirstName => "first_name",
            DoctorColumn::LastName => "last_name",
            DoctorColumn::Specialization => "specialization",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitColumn {
    PatientId,
    DoctorId,
    VisitDate,
    Diagnosis,
}

impl Column for VisitColumn {
    const TABLE: &'static str = "visits";
    const KIND: EntityKind = EntityKind::Visit;
    const ALL: &'static [Self] = &[
        VisitColumn::PatientId,
        VisitColumn::DoctorId,
        VisitColumn::VisitDate,
        VisitColumn::Diagnosis,
    ];

    fn name(self) -> &'static str {
        match self {
            VisitColumn::PatientId => "patient_id",
            VisitColumn::DoctorId => "doctor_id",
            VisitColumn::VisitDate => "visit_date",
            VisitColumn::Diagnosis => "diagnosis",
        }
    }
}
