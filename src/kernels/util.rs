use super::{CellKernel, Frag, PassInputs};
use crate::config::F;

/// Покомпонентное копирование входа "tex"
pub struct CopyKernel;

impl CellKernel for CopyKernel {
    fn eval(&self, frag: &Frag, inputs: &PassInputs) -> [F; 4] {
        inputs.get("tex").fetch(frag.x as isize, frag.y as isize)
    }
}

/// Выборка входа "tex" в центре ячейки с умножением на скаляр.
/// При уменьшении вдвое линейная интерполяция усредняет блок входных
/// ячеек, так что scale = 2 или 4 дает их сумму (box-filter свертка
/// редукции); при совпадающих размерах выборка попадает точно в ячейку.
pub struct ScaleKernel {
    pub scale: F,
}

impl CellKernel for ScaleKernel {
    fn eval(&self, frag: &Frag, inputs: &PassInputs) -> [F; 4] {
        let [u, v] = frag.uv();
        let mut out = inputs.get("tex").sample(u, v);
        for c in out.iter_mut() {
            *c *= self.scale;
        }
        out
    }
}

/// Квадрат модуля комплексного поля "tex" в канале 0
pub struct AbsSquareKernel;

impl CellKernel for AbsSquareKernel {
    fn eval(&self, frag: &Frag, inputs: &PassInputs) -> [F; 4] {
        let cell = inputs.get("tex").fetch(frag.x as isize, frag.y as isize);
        [cell[0] * cell[0] + cell[1] * cell[1], 0.0, 0.0, 0.0]
    }
}
