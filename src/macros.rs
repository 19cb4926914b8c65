macro_rules! all_the_tuples {
    ($name:ident) => {
        $name!([]);
        $name!([P1]);
        $name!([P1, P2]);
        $name!([P1, P2, P3]);
        $name!([P1, P2, P3, P4]);
        $name!([P1, P2, P3, P4, P5]);
        $name!([P1, P2, P3, P4, P5, P6]);
        $name!([P1, P2, P3, P4, P5, P6, P7]);
        $name!([P1, P2, P3, P4, P5, P6, P7, P8]);
        $name!([P1, P2, P3, P4, P5, P6, P7, P8, P9]);
        $name!([P1, P2, P3, P4, P5, P6, P7, P8, P9, P10]);
        $name!([P1, P2, P3, P4, P5, P6, P7, P8, P9, P10, P11]);
        $name!([P1, P2, P3, P4, P5, P6, P7, P8, P9, P10, P11, P12]);
    };
}
