//! Column lists for the `materials` table.

/// Columns stored as JSON-encoded string arrays.
pub const ARRAY_COLUMNS: &[&str] = &[
    "sign_types",
    "use_cases",
    "install_methods",
    "laminate_types",
    "surface_finish_options",
    "edge_finish_options",
    "recommended_substrates",
];

/// Columns holding loosely-typed boolean markers (`1/0`, `yes/no`, `y/n`, ...).
pub const BOOLEAN_COLUMNS: &[&str] = &[
    "indoor_use",
    "outdoor_use",
    "temporary",
    "permanent",
    "outdoor_temporary_only",
    "double_sided",
    "double_sided_supported",
    "print_uv_ok",
    "print_latex_ok",
    "print_solvent_ok",
    "lamination_allowed",
    "lamination_required_outdoors",
    "air_egress",
    "can_grommet",
    "can_weld",
    "can_sew",
    "needs_hem",
    "salt_air_ok",
    "requires_slip_laminate",
];

/// Every column an admin write may touch. `id` is included so inserts can set it.
pub const WRITABLE_COLUMNS: &[&str] = &[
    "id",
    "category",
    "name",
    "format",
    "tier_hint",
    "thickness",
    "sign_types",
    "use_cases",
    "install_methods",
    "notes",
    "sqft",
    "difficulty",
    "indoor_use",
    "indoor_life",
    "outdoor_use",
    "outdoor_life",
    "temporary",
    "permanent",
    "outdoor_temporary_only",
    "wind",
    "wind_rating_0_5",
    "double_sided",
    "double_sided_supported",
    "max_size",
    "max_width_in",
    "max_height_in",
    "indoor_life_months_min",
    "indoor_life_months_max",
    "outdoor_life_months_min",
    "outdoor_life_months_max",
    "uv_resistance_0_5",
    "water_resistance_0_5",
    "chemical_resistance_0_5",
    "temp_min_f",
    "temp_max_f",
    "humidity_sensitivity_0_5",
    "salt_air_ok",
    "rigidity_0_5",
    "impact_resistance_0_5",
    "warp_risk_0_5",
    "recommended_max_unframed_area_sqft",
    "mounting_requirements",
    "print_uv_ok",
    "print_latex_ok",
    "print_solvent_ok",
    "lamination_allowed",
    "lamination_required_outdoors",
    "laminate_types",
    "surface_finish_options",
    "edge_finish_options",
    "adhesive_type",
    "removal_cleanliness_0_5",
    "conformability_0_5",
    "air_egress",
    "recommended_substrates",
    "can_grommet",
    "can_weld",
    "can_sew",
    "needs_hem",
    "min_install_temp_f",
    "installer_skill_level_1_5",
    "install_time_multiplier",
    "material_cost_sqft",
    "print_cost_sqft",
    "laminate_cost_sqft",
    "waste_factor_percent",
    "setup_fee",
    "preferred_vendor",
    "vendor_sku",
    "lead_time_days",
    "min_order_sqft",
    "roll_width",
    "requires_slip_laminate",
    "max_w_in",
    "max_h_in",
    "uv_resistance_0_10",
    "water_resistance_0_10",
    "chemical_resistance_0_10",
    "humidity_sensitivity_0_10",
    "rigidity_0_10",
    "impact_resistance_0_10",
    "warp_risk_0_10",
    "removal_cleanliness_0_10",
    "conformability_0_10",
    "wind_rating_0_10",
];
