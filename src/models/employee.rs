#[derive(Debug, Clone)]
pub struct Department {
    pub id: Option<i64>,
    pub name: String,
}

impl Department {
    pub fn new(name: String) -> Self {
        Self { id: None, name }
    }
}

#[derive(Debug, Clone)]
pub struct Employee {
    pub emp_id: String,
    pub emp_name: String,
    pub department_id: Option<i64>,
}

impl Employee {
    pub fn new(emp_id: String, emp_name: String) -> Self {
        Self {
            emp_id,
            emp_name,
            department_id: None,
        }
    }
}

impl std::fmt::Display for Employee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.emp_name)
    }
}

/// Result row of the employee → department join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeListing {
    pub emp_id: String,
    pub emp_name: String,
    pub department: Option<String>,
}
