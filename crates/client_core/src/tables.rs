//! Registry of the hosted database tables. The physical names are the
//! Vietnamese ones the ERP schema was created with; code always addresses
//! tables through the logical variants.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Orders,
    Inventory,
    Customers,
    Services,
    Products,
    Workflows,
    WorkflowStages,
    WorkflowTasks,
    Members,
    Notifications,
    ServiceItems,
}

impl Table {
    pub const ALL: [Table; 11] = [
        Table::Orders,
        Table::Inventory,
        Table::Customers,
        Table::Services,
        Table::Products,
        Table::Workflows,
        Table::WorkflowStages,
        Table::WorkflowTasks,
        Table::Members,
        Table::Notifications,
        Table::ServiceItems,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Table::Orders => "don_hang",
            Table::Inventory => "kho_vat_tu",
            Table::Customers => "khach_hang",
            Table::Services => "dich_vu_spa",
            Table::Products => "san_pham_ban_le",
            Table::Workflows => "quy_trinh",
            Table::WorkflowStages => "cac_buoc_quy_trinh",
            Table::WorkflowTasks => "cac_task_quy_trinh",
            Table::Members => "nhan_su",
            Table::Notifications => "thong_bao",
            Table::ServiceItems => "hang_muc_dich_vu",
        }
    }
}
