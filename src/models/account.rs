#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    ResourceManager,
    StakeHolder,
    TeamMember,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ViewCapacity,
    EditAllocation,
    EditCapacity,
    ManageInitiatives,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewCapacity => "view_capacity",
            Self::EditAllocation => "edit_allocation",
            Self::EditCapacity => "edit_capacity",
            Self::ManageInitiatives => "manage_initiatives",
        }
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResourceManager => "Resource Manager",
            Self::StakeHolder => "Stakeholder",
            Self::TeamMember => "Team Member",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().replace(['_', '-'], " ").trim() {
            "resource manager" | "resourcemanager" | "manager" => Self::ResourceManager,
            "stakeholder" | "stake holder" => Self::StakeHolder,
            _ => Self::TeamMember,
        }
    }

    pub fn all() -> &'static [Role] {
        &[Self::ResourceManager, Self::StakeHolder, Self::TeamMember]
    }

    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            Self::ResourceManager => &[
                Capability::ViewCapacity,
                Capability::EditAllocation,
                Capability::EditCapacity,
                Capability::ManageInitiatives,
            ],
            Self::StakeHolder => &[Capability::ViewCapacity, Capability::ManageInitiatives],
            Self::TeamMember => &[Capability::ViewCapacity],
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A login account, linked to an employee record by `emp_id`.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Option<i64>,
    pub username: String,
    pub emp_id: String,
    pub role: Role,
    pub created_at: String,
}

impl Account {
    pub fn new(username: String, emp_id: String, role: Role) -> Self {
        Self {
            id: None,
            username,
            emp_id,
            role,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
