pub mod adc_mic;
