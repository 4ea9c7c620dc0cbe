/// What a confirmation dialog will do when accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Logout,
}

/// Confirmation dialog for actions that end something
pub struct ConfirmDialog {
    pub title: &'static str,
    pub message: &'static str,
    pub confirm_label: &'static str,
    pub cancel_label: &'static str,
    pub confirm_selected: bool,
    pub action: ConfirmAction,
}

impl ConfirmDialog {
    pub fn logout() -> Self {
        Self {
            title: "¿Cerrar sesión?",
            message: "Saldrás de tu cuenta actual y deberás ingresar de nuevo para continuar.",
            confirm_label: "Cerrar sesión",
            cancel_label: "Cancelar",
            confirm_selected: false,
            action: ConfirmAction::Logout,
        }
    }

    pub fn toggle_selection(&mut self) {
        self.confirm_selected = !self.confirm_selected;
    }
}

/// Info dialog for displaying multi-line information
pub struct InfoDialog {
    pub title: String,
    pub lines: Vec<String>,
}

impl InfoDialog {
    pub fn new(title: String, lines: Vec<String>) -> Self {
        Self { title, lines }
    }

    pub fn help() -> Self {
        let lines = [
            ("/  Ctrl+F", "Buscar paciente"),
            ("↑ ↓  Enter", "Elegir resultado"),
            ("Esc", "Cerrar resultados"),
            ("Tab", "Búsqueda → menú → contenido"),
            ("Ctrl+B", "Mostrar/ocultar menú lateral"),
            ("Alt+←", "Volver"),
            ("F5", "Recargar pacientes"),
            ("Ctrl+L", "Cerrar sesión"),
            ("Ctrl+Q", "Salir"),
        ];
        Self::new(
            "Atajos".to_string(),
            lines
                .iter()
                .map(|(keys, what)| format!("{:<12} {}", keys, what))
                .collect(),
        )
    }
}

/// Which dialog is currently active
pub enum ActiveMenu {
    None,
    Confirm(ConfirmDialog),
    Info(InfoDialog),
}

impl ActiveMenu {
    pub fn is_open(&self) -> bool {
        !matches!(self, ActiveMenu::None)
    }
}
