use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::types::{GestureLabel, WINDOW_SIZE};

/// Qué hacer con la ventana cuando un frame no trae mano
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissPolicy {
    /// Dejar la ventana intacta: el último gesto se reconfirma en cuanto
    /// vuelve la mano
    #[default]
    Hold,
    /// Rellenar la ventana con el centinela
    Reset,
}

/// Ventana deslizante de las últimas N etiquetas.
/// Confirma un gesto solo cuando las N posiciones coinciden.
pub struct GestureBuffer {
    buffer: VecDeque<GestureLabel>,
    window_size: usize,
    sentinel: GestureLabel,
}

impl GestureBuffer {
    /// Crea una ventana de `window_size` posiciones llena de `sentinel`
    pub fn new(window_size: usize, sentinel: GestureLabel) -> Self {
        let window_size = window_size.max(1);
        let mut buffer = VecDeque::with_capacity(window_size);
        buffer.resize(window_size, sentinel);
        Self {
            buffer,
            window_size,
            sentinel,
        }
    }

    /// Añade la etiqueta del frame actual descartando la más antigua.
    /// Devuelve el gesto confirmado si la ventana quedó uniforme.
    pub fn push(&mut self, label: GestureLabel) -> Option<GestureLabel> {
        self.buffer.pop_front();
        self.buffer.push_back(label);
        self.confirmed()
    }

    /// Verdadero si todas las posiciones tienen la misma etiqueta
    pub fn is_uniform(&self) -> bool {
        match self.buffer.front() {
            Some(first) => self.buffer.iter().all(|l| l == first),
            None => false,
        }
    }

    /// Etiqueta común de la ventana, salvo que sea el centinela
    pub fn confirmed(&self) -> Option<GestureLabel> {
        if !self.is_uniform() {
            return None;
        }
        self.buffer.back().copied().filter(|l| *l != self.sentinel)
    }

    /// Frame sin mano
    pub fn observe_miss(&mut self, policy: MissPolicy) {
        if policy == MissPolicy::Reset {
            self.reset();
        }
    }

    /// Vuelve al estado inicial (todo centinela)
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.buffer.resize(self.window_size, self.sentinel);
    }

    pub fn iter(&self) -> impl Iterator<Item = &GestureLabel> {
        self.buffer.iter()
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }
}

impl Default for GestureBuffer {
    fn default() -> Self {
        Self::new(WINDOW_SIZE, GestureLabel::None)
    }
}
