use std::sync::Arc;

use typed_arrow_any::{
    arrow_array::{DictionaryArray, Float32Array, Int8Array, StringArray, types::Int8Type},
    prelude::*,
};

fn main() {
    let floats = Float32Array::from(vec![1.5, 2.5]);
    let view: TypedView<'_, u64> = make_view(&floats).unwrap();
    assert_eq!(view.value(1), 2);

    let keys = Int8Array::from(vec![1, 0]);
    let values = Arc::new(StringArray::from(vec!["a", "b"]));
    let dictionary = DictionaryArray::<Int8Type>::try_new(keys, values).unwrap();
    let view = make_view::<Text>(&dictionary).unwrap();
    assert_eq!(view.strategy(), Strategy::Dictionary);
    assert_eq!(view.value(0), "b");
}
